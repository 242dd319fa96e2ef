/// The only two states the page can be in. Errors are rendered inline and
/// never form states of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Unauthenticated,
    Authenticated,
}

impl View {
    pub fn for_token(token: Option<&str>) -> Self {
        match token {
            Some(token) if !token.is_empty() => View::Authenticated,
            _ => View::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_token_means_authenticated() {
        assert_eq!(View::for_token(Some("tok")), View::Authenticated);
        assert_eq!(View::for_token(Some("")), View::Unauthenticated);
        assert_eq!(View::for_token(None), View::Unauthenticated);
    }
}
