use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::http::CatalogApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Backend,
    Analysis,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Backend, Service::Analysis];

    pub fn path(self) -> &'static str {
        match self {
            Service::Backend => "/stats/health",
            Service::Analysis => "/stats/health/analysis",
        }
    }

    /// The two services disagree on casing; the value is compared verbatim.
    pub fn healthy_status(self) -> &'static str {
        match self {
            Service::Backend => "ok",
            Service::Analysis => "OK",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Backend => write!(f, "backend"),
            Service::Analysis => write!(f, "analysis service"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Online,
    Offline,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceStatus::Online => "online",
            ServiceStatus::Offline => "offline",
        };
        f.write_str(label)
    }
}

pub async fn check(api: &dyn CatalogApi, service: Service) -> ServiceStatus {
    match api.get(service.path(), &[]).await {
        Ok(body) => {
            let status = body.get("status").and_then(Value::as_str);
            if status == Some(service.healthy_status()) {
                info!("{} is online", service);
                ServiceStatus::Online
            } else {
                warn!("{} answered with unexpected status {:?}", service, status);
                ServiceStatus::Offline
            }
        }
        Err(e) => {
            warn!("Error checking {} status: {}", service, e);
            ServiceStatus::Offline
        }
    }
}
