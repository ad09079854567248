//! Identity collaborator
//!
//! Authentication itself lives outside this crate. The layout editor only
//! needs to know who is acting and whether they are an administrator.

use std::collections::HashMap;

use serde::Deserialize;

/// The actor behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: true,
        }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
        }
    }
}

/// Resolves bearer tokens to actors
pub trait IdentityProvider: Send + Sync {
    fn actor_for_token(&self, token: &str) -> Option<Actor>;
}

/// One configured API token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenEntry {
    pub token: String,
    pub actor_id: String,
    #[serde(default)]
    pub admin: bool,
}

/// Identity provider backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, Actor>,
}

impl StaticTokens {
    pub fn new(entries: &[TokenEntry]) -> Self {
        let tokens = entries
            .iter()
            .filter(|entry| !entry.token.is_empty())
            .map(|entry| {
                let actor = Actor {
                    id: entry.actor_id.clone(),
                    is_admin: entry.admin,
                };
                (entry.token.clone(), actor)
            })
            .collect();
        Self { tokens }
    }
}

impl IdentityProvider for StaticTokens {
    fn actor_for_token(&self, token: &str) -> Option<Actor> {
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_tokens() {
        let provider = StaticTokens::new(&[
            TokenEntry {
                token: "secret".into(),
                actor_id: "owner".into(),
                admin: true,
            },
            TokenEntry {
                token: String::new(),
                actor_id: "nobody".into(),
                admin: true,
            },
        ]);
        assert_eq!(provider.actor_for_token("secret"), Some(Actor::admin("owner")));
        assert_eq!(provider.actor_for_token(""), None);
        assert_eq!(provider.actor_for_token("guess"), None);
    }
}
