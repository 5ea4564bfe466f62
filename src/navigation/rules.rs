/// Pages of the client application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Landing,
    SignIn,
    SignUp,
    Onboarding,
    Track,
    Analytics,
    Settings,
}

impl AppRoute {
    /// Parses a client path; trailing slashes, query and fragment are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => AppRoute::Landing,
            "/sign-in" => AppRoute::SignIn,
            "/sign-up" => AppRoute::SignUp,
            "/onboarding" => AppRoute::Onboarding,
            "/track" => AppRoute::Track,
            "/analytics" => AppRoute::Analytics,
            "/settings" => AppRoute::Settings,
            _ => return None,
        };
        // "" is only the landing page when the input was rooted.
        if route == AppRoute::Landing && !path.starts_with('/') {
            return None;
        }
        Some(route)
    }

    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Landing => "/",
            AppRoute::SignIn => "/sign-in",
            AppRoute::SignUp => "/sign-up",
            AppRoute::Onboarding => "/onboarding",
            AppRoute::Track => "/track",
            AppRoute::Analytics => "/analytics",
            AppRoute::Settings => "/settings",
        }
    }

    fn requires_auth(self) -> bool {
        matches!(
            self,
            AppRoute::Onboarding | AppRoute::Track | AppRoute::Analytics | AppRoute::Settings
        )
    }

    /// Pages only meant for signed-out visitors.
    fn is_auth_only(self) -> bool {
        matches!(self, AppRoute::SignIn | AppRoute::SignUp)
    }
}

/// Per-request view of who is asking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub profile_complete: bool,
}

/// Where a visit to `route` should be redirected, if anywhere.
pub fn resolve(route: AppRoute, session: Session) -> Option<AppRoute> {
    if !session.authenticated {
        return route.requires_auth().then_some(AppRoute::SignIn);
    }
    if route.is_auth_only() {
        return Some(AppRoute::Track);
    }
    if !session.profile_complete && route != AppRoute::Onboarding {
        return Some(AppRoute::Onboarding);
    }
    None
}

/// Follows redirects until a page that renders.
pub fn settle(mut route: AppRoute, session: Session) -> AppRoute {
    // Longest chain is SignIn -> Track -> Onboarding.
    for _ in 0..3 {
        match resolve(route, session) {
            Some(next) => route = next,
            None => break,
        }
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: Session = Session {
        authenticated: false,
        profile_complete: false,
    };
    const NEW_USER: Session = Session {
        authenticated: true,
        profile_complete: false,
    };
    const READY: Session = Session {
        authenticated: true,
        profile_complete: true,
    };

    fn target(path: &str, session: Session) -> Option<&'static str> {
        resolve(AppRoute::from_path(path).unwrap(), session).map(AppRoute::path)
    }

    #[test]
    fn anonymous_visitors_are_sent_to_sign_in() {
        assert_eq!(target("/track", ANON), Some("/sign-in"));
        assert_eq!(target("/analytics", ANON), Some("/sign-in"));
        assert_eq!(target("/settings", ANON), Some("/sign-in"));
        assert_eq!(target("/onboarding", ANON), Some("/sign-in"));
        assert_eq!(target("/", ANON), None);
        assert_eq!(target("/sign-in", ANON), None);
        assert_eq!(target("/sign-up", ANON), None);
    }

    #[test]
    fn signed_in_users_skip_auth_pages() {
        assert_eq!(target("/sign-in", READY), Some("/track"));
        assert_eq!(target("/sign-up", READY), Some("/track"));
        assert_eq!(target("/sign-in", NEW_USER), Some("/track"));
    }

    #[test]
    fn incomplete_profiles_go_to_onboarding() {
        assert_eq!(target("/analytics", NEW_USER), Some("/onboarding"));
        assert_eq!(target("/track", NEW_USER), Some("/onboarding"));
        assert_eq!(target("/settings", NEW_USER), Some("/onboarding"));
        assert_eq!(target("/", NEW_USER), Some("/onboarding"));
        assert_eq!(target("/onboarding", NEW_USER), None);
    }

    #[test]
    fn complete_profiles_stay_put() {
        for path in ["/", "/track", "/analytics", "/settings", "/onboarding"] {
            assert_eq!(target(path, READY), None, "{path}");
        }
    }

    #[test]
    fn settle_follows_the_chain() {
        assert_eq!(settle(AppRoute::SignIn, NEW_USER), AppRoute::Onboarding);
        assert_eq!(settle(AppRoute::SignIn, READY), AppRoute::Track);
        assert_eq!(settle(AppRoute::Analytics, ANON), AppRoute::SignIn);
        assert_eq!(settle(AppRoute::Landing, ANON), AppRoute::Landing);
    }

    #[test]
    fn paths_are_normalized() {
        assert_eq!(AppRoute::from_path("/track/"), Some(AppRoute::Track));
        assert_eq!(AppRoute::from_path("/track?day=today"), Some(AppRoute::Track));
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Landing));
        assert_eq!(AppRoute::from_path("/nope"), None);
        assert_eq!(AppRoute::from_path(""), None);
        assert_eq!(AppRoute::from_path("track"), None);
    }
}
