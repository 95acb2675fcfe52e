use super::response::{write_error, write_response};
use crate::dispatcher::Dispatcher;
use anyhow::{Context, Result};
use may_minihttp::{HttpService, Request, Response};
use std::io::{self, Read};
use tracing::{debug, warn};

/// `may_minihttp` service that feeds every request through a [`Dispatcher`].
///
/// Each connection coroutine works on its own clone; all clones share the
/// dispatcher's route table.
#[derive(Clone)]
pub struct AppService {
    dispatcher: Dispatcher,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Copy method, target, headers and body into an owned `http::Request`.
pub fn into_http_request(req: Request) -> Result<http::Request<Vec<u8>>> {
    let mut builder = http::Request::builder()
        .method(req.method())
        .uri(req.path());
    for header in req.headers() {
        builder = builder.header(header.name, header.value);
    }

    let mut body = Vec::new();
    req.body()
        .read_to_end(&mut body)
        .context("Failed to read request body")?;

    builder.body(body).context("Malformed request line or headers")
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let method = req.method().to_string();
        let target = req.path().to_string();

        match into_http_request(req) {
            Ok(request) => {
                let response = self.dispatcher.handle(request);
                debug!(
                    method = %method,
                    target = %target,
                    status = response.status().as_u16(),
                    "Response written"
                );
                write_response(res, response);
            }
            Err(e) => {
                warn!(
                    method = %method,
                    target = %target,
                    error = %e,
                    "Rejected unparseable request"
                );
                write_error(res, http::StatusCode::BAD_REQUEST, "Bad Request");
            }
        }
        Ok(())
    }
}
