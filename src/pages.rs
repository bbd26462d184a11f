//! Front-end route table: which page renders for which path.
//!
//! The table is static. Child paths are relative to their parent and a
//! `:name` segment captures one percent-decoded path segment.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Exercise,
    About,
}

#[derive(Debug)]
pub struct RouteDef {
    pub path: &'static str,
    pub page: Page,
    pub children: &'static [RouteDef],
}

pub const ROUTES: &[RouteDef] = &[
    RouteDef {
        path: "/",
        page: Page::Home,
        children: &[RouteDef {
            path: "exercise/:exerciseName",
            page: Page::Exercise,
            children: &[],
        }],
    },
    RouteDef {
        path: "/about",
        page: Page::About,
        children: &[],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub page: Page,
    pub params: Vec<(&'static str, String)>,
}

impl ResolvedRoute {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(
    pattern: &[&'static str],
    path: &[&str],
) -> Option<Vec<(&'static str, String)>> {
    if pattern.len() != path.len() {
        return None;
    }

    let mut params = Vec::new();
    for (&expected, &actual) in pattern.iter().zip(path.iter()) {
        match expected.strip_prefix(':') {
            Some(name) => {
                let value = urlencoding::decode(actual).map(Cow::into_owned).ok()?;
                params.push((name, value));
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

fn resolve_in(
    routes: &'static [RouteDef],
    prefix: &[&'static str],
    path: &[&str],
) -> Option<ResolvedRoute> {
    for route in routes {
        let mut pattern = prefix.to_vec();
        pattern.extend(segments(route.path));

        if let Some(params) = match_segments(&pattern, path) {
            return Some(ResolvedRoute {
                page: route.page,
                params,
            });
        }
        if let Some(found) = resolve_in(route.children, &pattern, path) {
            return Some(found);
        }
    }
    None
}

/// Find the page for `path`. Query strings, fragments and trailing slashes
/// are ignored.
pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or(path);
    let parts: Vec<&str> = segments(path).collect();
    resolve_in(ROUTES, &[], &parts)
}

pub fn exercise_path(exercise_name: &str) -> String {
    format!("/exercise/{}", urlencoding::encode(exercise_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_static_pages() {
        assert_eq!(resolve("/").map(|r| r.page), Some(Page::Home));
        assert_eq!(resolve("").map(|r| r.page), Some(Page::Home));
        assert_eq!(resolve("/about").map(|r| r.page), Some(Page::About));
        assert_eq!(resolve("/about/").map(|r| r.page), Some(Page::About));
        assert_eq!(resolve("/about?tab=1").map(|r| r.page), Some(Page::About));
    }

    #[test]
    fn test_resolve_nested_exercise_page() {
        let route = resolve("/exercise/Bench%20Press").unwrap();

        assert_eq!(route.page, Page::Exercise);
        assert_eq!(route.param("exerciseName"), Some("Bench Press"));
        assert_eq!(route.param("missing"), None);
    }

    #[test]
    fn test_resolve_unknown_paths() {
        assert!(resolve("/settings").is_none());
        assert!(resolve("/exercise").is_none());
        assert!(resolve("/exercise/a/b").is_none());
        assert!(resolve("/about/team").is_none());
    }

    #[test]
    fn test_exercise_path_round_trips_through_resolve() {
        let path = exercise_path("Squat / Pause");
        assert_eq!(path, "/exercise/Squat%20%2F%20Pause");

        let route = resolve(&path).unwrap();
        assert_eq!(route.param("exerciseName"), Some("Squat / Pause"));
    }
}
