// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Tracking of algorithm channel subscriptions.

use std::collections::BTreeMap;

/// Tracks which configured algorithm channels have confirmed their join.
///
/// Confirmation state is cleared on every reconnect so each new transport
/// re-joins all channels from scratch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    entries: BTreeMap<u32, bool>,
}

impl SubscriptionSet {
    /// Creates a tracker for the given algorithm channels, all unconfirmed.
    #[must_use]
    pub fn new(algo_ids: &[u32]) -> Self {
        Self {
            entries: algo_ids.iter().map(|id| (*id, false)).collect(),
        }
    }

    /// Clears all confirmations.
    pub fn reset(&mut self) {
        for confirmed in self.entries.values_mut() {
            *confirmed = false;
        }
    }

    /// Records a join confirmation.
    ///
    /// Returns `false` when the channel is not tracked.
    pub fn mark_subscribed(&mut self, algo_id: u32) -> bool {
        match self.entries.get_mut(&algo_id) {
            Some(confirmed) => {
                *confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Whether the given channel has confirmed its join.
    #[must_use]
    pub fn is_subscribed(&self, algo_id: u32) -> bool {
        self.entries.get(&algo_id).copied().unwrap_or(false)
    }

    /// Whether every tracked channel has confirmed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.values().all(|confirmed| *confirmed)
    }

    /// Channels still awaiting confirmation, in ascending order.
    #[must_use]
    pub fn pending(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|(_, confirmed)| !**confirmed)
            .map(|(id, _)| *id)
            .collect()
    }

    /// All tracked channels, in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    /// Number of tracked channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no channels are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn new_tracker_starts_unconfirmed() {
        let set = SubscriptionSet::new(&[16, 14, 17]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.ids(), vec![14, 16, 17]);
        assert_eq!(set.pending(), vec![14, 16, 17]);
        assert!(!set.is_complete());
    }

    #[rstest]
    fn confirmations_complete_the_set() {
        let mut set = SubscriptionSet::new(&[14, 16]);
        assert!(set.mark_subscribed(14));
        assert!(set.is_subscribed(14));
        assert!(!set.is_complete());
        assert_eq!(set.pending(), vec![16]);

        assert!(set.mark_subscribed(16));
        assert!(set.is_complete());
        assert!(set.pending().is_empty());
    }

    #[rstest]
    fn untracked_channel_is_ignored() {
        let mut set = SubscriptionSet::new(&[14]);
        assert!(!set.mark_subscribed(99));
        assert!(!set.is_subscribed(99));
        assert!(!set.is_complete());
    }

    #[rstest]
    fn reset_clears_confirmations() {
        let mut set = SubscriptionSet::new(&[14, 16]);
        set.mark_subscribed(14);
        set.mark_subscribed(16);
        assert!(set.is_complete());

        set.reset();
        assert!(!set.is_complete());
        assert_eq!(set.pending(), vec![14, 16]);
    }

    #[rstest]
    fn duplicate_ids_collapse() {
        let set = SubscriptionSet::new(&[14, 14, 16]);
        assert_eq!(set.len(), 2);
    }
}
