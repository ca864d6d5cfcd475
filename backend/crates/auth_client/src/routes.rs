//! Frontend Routes
//!
//! Paths the forms navigate to, plus the sidebar and auth link lists.

#[derive(Debug, Clone, Copy)]
pub struct Routes {
    pub home: &'static str,
    pub sign_in: &'static str,
    pub sign_up: &'static str,
    pub ask_question: &'static str,
    pub collection: &'static str,
    pub community: &'static str,
    pub tags: &'static str,
    pub jobs: &'static str,
    pub sign_in_with_oauth: &'static str,
}

impl Routes {
    pub fn profile(&self, id: &str) -> String {
        format!("/profile/{id}")
    }

    pub fn question(&self, id: &str) -> String {
        format!("/questions/{id}")
    }

    pub fn tag(&self, id: &str) -> String {
        format!("{}/{id}", self.tags)
    }
}

pub const ROUTES: Routes = Routes {
    home: "/",
    sign_in: "/sign-in",
    sign_up: "/sign-up",
    ask_question: "/ask-question",
    collection: "/collection",
    community: "/community",
    tags: "/tags",
    jobs: "/jobs",
    sign_in_with_oauth: "signin-with-oauth",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: &'static str,
    pub label: &'static str,
    pub icon: Option<&'static str>,
}

impl NavLink {
    const fn new(route: &'static str, label: &'static str, icon: &'static str) -> Self {
        Self {
            route,
            label,
            icon: Some(icon),
        }
    }

    const fn plain(route: &'static str, label: &'static str) -> Self {
        Self {
            route,
            label,
            icon: None,
        }
    }

    /// Highlighted when the current path is exactly this route
    pub fn is_active(&self, pathname: &str) -> bool {
        self.route == pathname
    }
}

pub const SIDEBAR_LINKS: [NavLink; 6] = [
    NavLink::new(ROUTES.home, "Home", "home-icon"),
    NavLink::new(ROUTES.collection, "Collections", "folder-icon"),
    NavLink::new(ROUTES.jobs, "Find Jobs", "briefcase-icon"),
    NavLink::new(ROUTES.tags, "Tags", "tag-icon"),
    NavLink::new(ROUTES.community, "Communities", "users-icon"),
    NavLink::new(ROUTES.ask_question, "Ask a Question", "question-icon"),
];

pub const AUTH_LINKS: [NavLink; 2] = [
    NavLink::plain(ROUTES.sign_in, "Sign In"),
    NavLink::plain(ROUTES.sign_up, "Sign Up"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_routes() {
        assert_eq!(ROUTES.profile("42"), "/profile/42");
        assert_eq!(ROUTES.question("abc"), "/questions/abc");
        assert_eq!(ROUTES.tag("rust"), "/tags/rust");
    }

    #[test]
    fn test_sidebar_routes_are_unique() {
        let mut routes: Vec<_> = SIDEBAR_LINKS.iter().map(|l| l.route).collect();
        routes.sort();
        routes.dedup();
        assert_eq!(routes.len(), SIDEBAR_LINKS.len());
        assert!(SIDEBAR_LINKS.iter().all(|l| l.icon.is_some()));
    }

    #[test]
    fn test_active_link() {
        assert!(SIDEBAR_LINKS[0].is_active("/"));
        assert!(!SIDEBAR_LINKS[0].is_active("/tags"));
        assert_eq!(AUTH_LINKS[1].route, "/sign-up");
    }
}
