//! Route table for the relay API.

use crate::error::ApiError;

use super::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /infos`: status report.
    Infos,
    /// `POST /control`: bulk relay update.
    Control,
    /// `POST /hostname`: set interface hostname.
    Hostname,
    /// `POST /default_state`: persist power-up state.
    DefaultState,
}

const ROUTES: [(&str, Route); 4] = [
    ("/infos", Route::Infos),
    ("/control", Route::Control),
    ("/hostname", Route::Hostname),
    ("/default_state", Route::DefaultState),
];

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        ROUTES.iter().find(|(p, _)| *p == path).map(|&(_, r)| r)
    }

    pub const fn method(self) -> Method {
        match self {
            Self::Infos => Method::Get,
            Self::Control | Self::Hostname | Self::DefaultState => Method::Post,
        }
    }

    /// Match path first, then method: an unknown path is always 404,
    /// whatever the verb.
    pub fn resolve(path: &str, method: Method) -> Result<Self, ApiError> {
        let route = Self::from_path(path).ok_or(ApiError::RouteNotFound)?;
        if route.method() != method {
            return Err(ApiError::MethodNotAllowed);
        }
        Ok(route)
    }
}
