//! Assignment of extracted emails to named persons.
//!
//! Emails found in a report header are matched to persons by comparing
//! the local part of the address with usual address spellings of each
//! person's name (`jdupont`, `jean.dupont`, ...).

use crate::model::Person;
use crate::text::fold_ascii;

/// Produces candidate email local parts for a person name.
pub trait NameVariantGenerator: Send + Sync {
    /// Candidate strings for `first last`, lower-cased.
    fn variants(&self, first_name: &str, last_name: &str) -> Vec<String>;
}

/// Common institutional address spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameVariants;

impl NameVariantGenerator for DefaultNameVariants {
    fn variants(&self, first_name: &str, last_name: &str) -> Vec<String> {
        let first = compact(first_name);
        let last = compact(last_name);
        if first.is_empty() {
            return if last.is_empty() { Vec::new() } else { vec![last] };
        }
        if last.is_empty() {
            return vec![first];
        }

        let initial: String = first.chars().take(1).collect();
        let mut variants = vec![
            last.clone(),
            first.clone(),
            format!("{first}.{last}"),
            format!("{first}{last}"),
            format!("{initial}.{last}"),
            format!("{initial}{last}"),
            format!("{last}.{first}"),
            format!("{last}{first}"),
            format!("{first}_{last}"),
            format!("{first}-{last}"),
        ];
        variants.dedup();
        variants
    }
}

/// Accent-free, lower-case name with inner spaces removed.
fn compact(name: &str) -> String {
    fold_ascii(name.trim())
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Assign emails to persons in place.
///
/// With exactly one person and one email the email is assigned without
/// comparison. Otherwise each email goes to the unassigned person whose
/// name variants are closest to its local part, provided the edit
/// distance is below half the local part length.
pub fn assign_emails(persons: &mut [Person], emails: &[String], generator: &dyn NameVariantGenerator) {
    if persons.is_empty() || emails.is_empty() {
        return;
    }

    if persons.len() == 1 && emails.len() == 1 {
        persons[0].email = Some(emails[0].clone());
        return;
    }

    let variants: Vec<Vec<String>> = persons
        .iter()
        .map(|p| {
            generator
                .variants(&p.first_name, &p.last_name)
                .into_iter()
                .map(|v| v.to_lowercase())
                .collect()
        })
        .collect();
    let mut assigned = vec![false; persons.len()];

    for email in emails {
        let Some((local, _)) = email.split_once('@') else {
            log::debug!("Skipping email without local part: {:?}", email);
            continue;
        };
        let local = local.to_lowercase();

        let mut best: Option<(usize, usize)> = None;
        for (i, candidates) in variants.iter().enumerate() {
            if assigned[i] {
                continue;
            }
            let Some(distance) = candidates
                .iter()
                .map(|v| strsim::levenshtein(&local, v))
                .min()
            else {
                continue;
            };
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        match best {
            Some((i, distance)) if 2 * distance < local.chars().count() => {
                persons[i].email = Some(email.clone());
                assigned[i] = true;
            }
            _ => log::debug!("No person close enough to {:?}", email),
        }
    }
}
