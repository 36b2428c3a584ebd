//! Route gating on the auth phase.

use crate::phase::AuthPhase;

/// Screens of the dashboard shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Root,
    /// `/dashboard`
    Dashboard,
    /// `/search`
    Search,
    /// `/collected`
    Collected,
    /// `/taobao-match`
    TaobaoMatch,
    /// `/markets`
    Markets,
    /// `/login`
    Login,
    /// `/signup`
    Signup,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Self; 8] = [
        Self::Root,
        Self::Dashboard,
        Self::Search,
        Self::Collected,
        Self::TaobaoMatch,
        Self::Markets,
        Self::Login,
        Self::Signup,
    ];

    /// URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Dashboard => "/dashboard",
            Self::Search => "/search",
            Self::Collected => "/collected",
            Self::TaobaoMatch => "/taobao-match",
            Self::Markets => "/markets",
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }

    /// Resolve a URL path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    /// Whether the route shows account data.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Search | Self::Collected | Self::TaobaoMatch | Self::Markets
        )
    }
}

/// What the shell should do for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the requested screen.
    Render,
    /// Show a neutral loading state.
    Loading,
    /// Navigate elsewhere.
    Redirect(Route),
}

/// Stateless route guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide how to handle `route` in `phase`.
    #[must_use]
    pub const fn decide(route: Route, phase: AuthPhase) -> RouteDecision {
        if !phase.is_resolved() {
            return RouteDecision::Loading;
        }
        match route {
            Route::Root => RouteDecision::Redirect(Route::Dashboard),
            route if route.requires_auth() => match phase {
                AuthPhase::Authenticated => RouteDecision::Render,
                _ => RouteDecision::Redirect(Route::Login),
            },
            _ => RouteDecision::Render,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_renders_before_bootstrap_resolves() {
        for phase in [AuthPhase::Uninitialized, AuthPhase::Checking] {
            for route in Route::ALL {
                assert_eq!(RouteGuard::decide(route, phase), RouteDecision::Loading);
            }
        }
    }

    #[test]
    fn protected_routes_redirect_when_logged_out() {
        assert_eq!(
            RouteGuard::decide(Route::Collected, AuthPhase::Unauthenticated),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(
            RouteGuard::decide(Route::Collected, AuthPhase::Authenticated),
            RouteDecision::Render
        );
        assert_eq!(
            RouteGuard::decide(Route::Signup, AuthPhase::Unauthenticated),
            RouteDecision::Render
        );
        assert_eq!(
            RouteGuard::decide(Route::Root, AuthPhase::Unauthenticated),
            RouteDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/markets/"), Some(Route::Markets));
        assert_eq!(Route::from_path(""), Some(Route::Root));
        assert_eq!(Route::from_path("/nowhere"), None);
    }
}
