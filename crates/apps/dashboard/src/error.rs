use catalog::CatalogError;

/// Top-level failure of a dashboard operation.
///
/// Fetch failures inside the layer and chart flows are folded into state
/// instead of surfacing here; this type covers what the caller asked for
/// directly (a missing dataset, an unreadable catalog, bad configuration).
#[derive(Debug)]
pub enum DashboardError {
    Catalog(CatalogError),
    Config(String),
    Io(std::io::Error),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Catalog(err) => write!(f, "{err}"),
            DashboardError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            DashboardError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Catalog(err) => Some(err),
            DashboardError::Config(_) => None,
            DashboardError::Io(err) => Some(err),
        }
    }
}

impl From<CatalogError> for DashboardError {
    fn from(err: CatalogError) -> Self {
        DashboardError::Catalog(err)
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err)
    }
}
