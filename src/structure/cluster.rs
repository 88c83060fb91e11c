//! Grouping of consecutive same-label tokens.

use crate::model::{Label, LabeledToken};

/// A maximal run of consecutive tokens sharing a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Label identifier without the begin prefix
    pub identifier: String,

    /// Parsed label, `None` when outside the taxonomy
    pub label: Option<Label>,

    /// Tokens of the cluster, never empty
    pub tokens: Vec<LabeledToken>,
}

impl Cluster {
    fn start(identifier: &str, token: LabeledToken) -> Self {
        Self {
            identifier: identifier.to_string(),
            label: Label::from_identifier(identifier),
            tokens: vec![token],
        }
    }

    /// Concatenated raw token text.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Group labeled tokens into clusters.
///
/// A new cluster starts on a begin-prefixed (`I-`) token, or whenever the
/// bare label differs from the previous non-empty token's label. Tokens
/// with empty text are skipped.
pub fn cluster_tokens<I>(tokens: I) -> Vec<Cluster>
where
    I: IntoIterator<Item = LabeledToken>,
{
    let mut clusters: Vec<Cluster> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let (begin, identifier) = Label::split_begin(&token.label);
        let identifier = identifier.to_string();
        match clusters.last_mut() {
            Some(current) if !begin && current.identifier == identifier => {
                current.tokens.push(token)
            }
            _ => clusters.push(Cluster::start(&identifier, token)),
        }
    }
    clusters
}
