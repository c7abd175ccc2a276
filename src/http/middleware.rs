//! Middleware dispatch engine.
//!
//! # Responsibilities
//! - Hold the ordered handler registry (registration order = execution order)
//! - Dispatch a completed request through the chain
//! - Provide each handler a continuation to invoke the next handler
//!
//! # Design Decisions
//! - The continuation is a by-value cursor: dropping it without calling
//!   `run` short-circuits the chain, the intended semantics
//! - The cursor lives per dispatch, so every dispatch starts at handler zero
//! - Handlers receive mutable borrows of the shared Request and Response,
//!   never copies; execution is strictly sequential within one dispatch

use crate::http::request::Request;
use crate::http::response::Response;

/// A registered middleware handler.
///
/// Receives the request, the response under construction, and the
/// continuation for the rest of the chain.
pub type Handler = Box<dyn Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync>;

/// Continuation capability handed to each handler.
///
/// Calling [`Next::run`] advances the cursor and invokes the handler there,
/// if any. Dropping it instead stops the chain for this request.
pub struct Next<'a> {
    chain: &'a MiddlewareChain,
    cursor: usize,
}

impl Next<'_> {
    /// Advance the cursor and invoke the next handler, if one exists.
    pub fn run(self, request: &mut Request, response: &mut Response) {
        self.chain.invoke(self.cursor, request, response);
    }
}

/// Ordered handler registry, fixed once the server starts listening.
#[derive(Default)]
pub struct MiddlewareChain {
    handlers: Vec<Handler>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; registration order is execution order.
    pub fn add<F>(&mut self, handler: F)
    where
        F: Fn(&mut Request, &mut Response, Next<'_>) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the chain over one completed request, starting at handler zero.
    ///
    /// Returns when the chain finishes or a handler declines to continue.
    pub fn dispatch(&self, request: &mut Request, response: &mut Response) {
        self.invoke(0, request, response);
    }

    fn invoke(&self, cursor: usize, request: &mut Request, response: &mut Response) {
        if let Some(handler) = self.handlers.get(cursor) {
            handler(
                request,
                response,
                Next {
                    chain: self,
                    cursor: cursor + 1,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn record(log: &Arc<Mutex<Vec<&'static str>>>, entry: &'static str) {
        log.lock().unwrap().push(entry);
    }

    #[test]
    fn empty_chain_is_a_no_op() {
        let chain = MiddlewareChain::new();
        let mut request = Request::new();
        let mut response = Response::new();
        chain.dispatch(&mut request, &mut response);
        assert_eq!(response.status, 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();

        let l = log.clone();
        chain.add(move |req, res, next| {
            record(&l, "first");
            next.run(req, res);
        });
        let l = log.clone();
        chain.add(move |req, res, next| {
            record(&l, "second");
            next.run(req, res);
        });
        let l = log.clone();
        chain.add(move |_req, _res, _next| {
            record(&l, "third");
        });

        chain.dispatch(&mut Request::new(), &mut Response::new());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn dropping_next_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();

        let l = log.clone();
        chain.add(move |req, res, next| {
            record(&l, "h0");
            next.run(req, res);
        });
        let l = log.clone();
        chain.add(move |_req, _res, _next| {
            record(&l, "h1");
            // continuation dropped: h2 must never run
        });
        let l = log.clone();
        chain.add(move |_req, _res, _next| {
            record(&l, "h2");
        });

        chain.dispatch(&mut Request::new(), &mut Response::new());
        assert_eq!(*log.lock().unwrap(), vec!["h0", "h1"]);
    }

    #[test]
    fn every_dispatch_starts_at_handler_zero() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();

        let l = log.clone();
        chain.add(move |_req, _res, _next| {
            record(&l, "h0");
        });
        let l = log.clone();
        chain.add(move |_req, _res, _next| {
            record(&l, "h1");
        });

        chain.dispatch(&mut Request::new(), &mut Response::new());
        chain.dispatch(&mut Request::new(), &mut Response::new());
        assert_eq!(*log.lock().unwrap(), vec!["h0", "h0"]);
    }

    #[test]
    fn handlers_mutate_the_shared_response() {
        let mut chain = MiddlewareChain::new();
        chain.add(|req, res, next| {
            res.set_header("x-seen-url", &req.url.clone());
            next.run(req, res);
        });
        chain.add(|_req, res, _next| {
            res.status = 201;
            res.body.push_str("done");
        });

        let mut request = Request::new();
        request.url = "/widgets".to_string();
        let mut response = Response::new();
        chain.dispatch(&mut request, &mut response);

        assert_eq!(response.status, 201);
        assert_eq!(response.body, "done");
        assert_eq!(
            response.headers.get("x-seen-url").map(String::as_str),
            Some("/widgets")
        );
    }
}
