//! Pairing time cards with check copies.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::config::IdentitySource;
use crate::models::records::{CheckCopy, TimeCard};

/// A time card and the check copy it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub time_card: TimeCard,
    pub check_copy: CheckCopy,
    /// 1 for a payee's first match in the run, 2 for the second, ...
    pub nth_check: u32,
}

impl MatchedPair {
    pub fn merged_output_name(&self) -> String {
        self.check_copy.merged_output_name(self.nth_check)
    }
}

/// Result of a matching pass.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Pairs in matching order.
    pub pairs: Vec<MatchedPair>,
    /// Time cards with no partner, sorted by output file name.
    pub unmatched_time_cards: Vec<TimeCard>,
    /// Check copies with no partner, sorted by output file name.
    pub unmatched_check_copies: Vec<CheckCopy>,
}

/// Pairs time cards with check copies by exact key equality.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    identity_source: IdentitySource,
}

impl Matcher {
    pub fn new(identity_source: IdentitySource) -> Self {
        Self { identity_source }
    }

    /// Match every time card against the check copy pool.
    ///
    /// Each time card takes the first remaining check copy, in pool order,
    /// whose key equals its own. Two check copies with identical keys are
    /// therefore resolved purely by their order in `check_copies`; nothing
    /// smarter is attempted.
    pub fn match_records(
        &self,
        time_cards: Vec<TimeCard>,
        check_copies: Vec<CheckCopy>,
    ) -> MatchOutcome {
        let keys: Vec<_> = check_copies
            .iter()
            .map(|cc| cc.match_key(self.identity_source))
            .collect();
        let mut pool: Vec<Option<CheckCopy>> = check_copies.into_iter().map(Some).collect();

        let mut payee_counter: HashMap<String, u32> = HashMap::new();
        let mut pairs = Vec::new();
        let mut unmatched_time_cards = Vec::new();

        for time_card in time_cards {
            let key = time_card.match_key();
            let position = pool.iter().zip(&keys).position(|(slot, cc_key)| {
                slot.is_some() && cc_key.as_ref() == Some(&key)
            });

            let Some(check_copy) = position.and_then(|i| pool[i].take()) else {
                unmatched_time_cards.push(time_card);
                continue;
            };

            let counter = payee_counter.entry(time_card.payee.counter_key()).or_insert(0);
            *counter += 1;

            info!(
                "{} <matched> {}",
                time_card.output_file_name(),
                check_copy.output_file_name()
            );
            pairs.push(MatchedPair {
                time_card,
                check_copy,
                nth_check: *counter,
            });
        }

        let mut unmatched_check_copies: Vec<CheckCopy> = pool.into_iter().flatten().collect();
        unmatched_time_cards.sort_by_cached_key(TimeCard::output_file_name);
        unmatched_check_copies.sort_by_cached_key(CheckCopy::output_file_name);

        debug!(
            "Matched {} pairs, {} time cards and {} check copies left over",
            pairs.len(),
            unmatched_time_cards.len(),
            unmatched_check_copies.len()
        );

        MatchOutcome {
            pairs,
            unmatched_time_cards,
            unmatched_check_copies,
        }
    }
}
