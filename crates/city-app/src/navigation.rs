//! Screen destinations and one-shot navigation signals.

use std::fmt;
use std::str::FromStr;

use city_core::CityId;
use thiserror::Error;

const CITY_LIST: &str = "city_list";
const CITY_MAP: &str = "city_map";
const CITY_DETAIL: &str = "city_detail";

/// A navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CityList,
    CityMap(CityId),
    CityDetail(CityId),
}

impl Route {
    /// Route string, e.g. `city_map/42`.
    pub fn path(&self) -> String {
        match self {
            Self::CityList => CITY_LIST.to_string(),
            Self::CityMap(id) => format!("{CITY_MAP}/{id}"),
            Self::CityDetail(id) => format!("{CITY_DETAIL}/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    Unknown(String),
    #[error("Invalid city id in route: {0}")]
    InvalidCityId(String),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim().trim_matches('/');
        if path == CITY_LIST {
            return Ok(Self::CityList);
        }

        let Some((screen, arg)) = path.split_once('/') else {
            return Err(RouteError::Unknown(path.to_string()));
        };
        let parse_id = || {
            arg.parse::<CityId>()
                .map_err(|_| RouteError::InvalidCityId(arg.to_string()))
        };
        match screen {
            CITY_MAP => Ok(Self::CityMap(parse_id()?)),
            CITY_DETAIL => Ok(Self::CityDetail(parse_id()?)),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

/// City id carried by a screen's route argument.
///
/// Absent and malformed arguments both yield `None`; surrounding whitespace
/// counts as malformed.
pub(crate) fn route_city_id(arg: Option<&str>) -> Option<CityId> {
    let raw = arg?;
    match raw.parse::<CityId>() {
        Ok(id) => Some(id),
        Err(error) => {
            tracing::warn!("Invalid city id in route argument {raw:?}: {error}");
            None
        }
    }
}

/// Signal emitted once by a controller asking the shell to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Show the map, unless the layout already shows it next to the list.
    MapIfSinglePane(CityId),
    Details(CityId),
}

impl NavigationEvent {
    /// Destination for single-pane layouts.
    pub const fn route(self) -> Route {
        match self {
            Self::MapIfSinglePane(id) => Route::CityMap(id),
            Self::Details(id) => Route::CityDetail(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::CityList,
            Route::CityMap(CityId::new(42)),
            Route::CityDetail(CityId::new(3_435_910)),
        ] {
            assert_eq!(route.path().parse::<Route>(), Ok(route));
        }
    }

    #[test]
    fn path_format() {
        assert_eq!(Route::CityList.to_string(), "city_list");
        assert_eq!(Route::CityMap(CityId::new(7)).path(), "city_map/7");
        assert_eq!(Route::CityDetail(CityId::new(7)).path(), "city_detail/7");
    }

    #[test]
    fn rejects_bad_routes() {
        assert_eq!(
            "city_map/abc".parse::<Route>(),
            Err(RouteError::InvalidCityId("abc".to_string()))
        );
        assert_eq!(
            "settings".parse::<Route>(),
            Err(RouteError::Unknown("settings".to_string()))
        );
        assert!("city_weather/1".parse::<Route>().is_err());
    }

    #[test]
    fn route_arguments_parse_strictly() {
        assert_eq!(route_city_id(Some("42")), Some(CityId::new(42)));
        assert_eq!(route_city_id(None), None);
        for arg in ["", "abc", "1.5", " 1 ", "1 "] {
            assert_eq!(route_city_id(Some(arg)), None, "{arg:?}");
        }
    }

    #[test]
    fn navigation_events_map_to_routes() {
        let id = CityId::new(9);
        assert_eq!(NavigationEvent::MapIfSinglePane(id).route(), Route::CityMap(id));
        assert_eq!(NavigationEvent::Details(id).route(), Route::CityDetail(id));
    }
}
