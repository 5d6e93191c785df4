//! DNS resolver installed into the HTTP client so that name-resolution
//! failures surface as a concrete error type in the source chain.

use std::{io, net::SocketAddr};

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
#[error("failed to resolve host {host}")]
pub struct ResolveError {
    pub host: String,
    #[source]
    pub source: io::Error,
}

/// Resolves through the system resolver via `tokio::net::lookup_host`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(lookup(name.as_str().to_string()))
    }
}

async fn lookup(host: String) -> Result<Addrs, BoxError> {
    // port is replaced by the connector
    let looked = tokio::net::lookup_host((host.as_str(), 0))
        .await
        .map(|addrs| addrs.collect::<Vec<SocketAddr>>());
    let addrs = match looked {
        Ok(addrs) => addrs,
        Err(source) => return Err(ResolveError { host, source }.into()),
    };
    if addrs.is_empty() {
        let source = io::Error::new(io::ErrorKind::NotFound, "no addresses returned");
        return Err(ResolveError { host, source }.into());
    }
    let addrs: Addrs = Box::new(addrs.into_iter());
    Ok(addrs)
}
