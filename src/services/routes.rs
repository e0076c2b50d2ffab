use tracing::instrument;

use crate::errors::ServiceError;
use crate::models::{EntityKind, Record, RouteRecord};
use crate::services::resolver::{DataSourceResolver, Provenance};

/// Routes matching a lookup, with the source they were read from.
#[derive(Debug, Clone)]
pub struct RouteLookup {
    pub source: Provenance,
    pub routes: Vec<RouteRecord>,
}

fn same_place(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Route lookups over resolved route data, so they work from either source.
#[derive(Clone)]
pub struct RouteService {
    resolver: DataSourceResolver,
}

impl RouteService {
    pub fn new(resolver: DataSourceResolver) -> Self {
        Self { resolver }
    }

    async fn matching(
        &self,
        keep: impl Fn(&RouteRecord) -> bool,
    ) -> Result<RouteLookup, ServiceError> {
        let resolution = self.resolver.resolve(EntityKind::Routes).await?;
        let routes = resolution
            .records
            .into_iter()
            .filter_map(|record| match record {
                Record::Route(route) if keep(&route) => Some(route),
                _ => None,
            })
            .collect();
        Ok(RouteLookup {
            source: resolution.source,
            routes,
        })
    }

    pub async fn all(&self) -> Result<RouteLookup, ServiceError> {
        self.matching(|_| true).await
    }

    #[instrument(skip(self))]
    pub async fn by_pair(&self, origin: &str, destination: &str) -> Result<RouteRecord, ServiceError> {
        self.matching(|r| same_place(&r.origin, origin) && same_place(&r.destination, destination))
            .await?
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no route from {} to {}", origin, destination))
            })
    }

    pub async fn by_origin(&self, origin: &str) -> Result<RouteLookup, ServiceError> {
        self.matching(|r| same_place(&r.origin, origin)).await
    }

    pub async fn by_destination(&self, destination: &str) -> Result<RouteLookup, ServiceError> {
        self.matching(|r| same_place(&r.destination, destination))
            .await
    }
}
