//! Property tests: conservation and determinism over random inputs

use card_reshuffle::{CardRecord, Collection, Priority, Role, ShuffleManager};
use proptest::prelude::*;
use std::collections::HashMap;

const IDENTITIES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn listing_strategy() -> impl Strategy<Value = (Collection, Vec<CardRecord>)> {
    (
        any::<bool>(),
        1u8..=5,
        any::<bool>(),
        prop::collection::vec((0usize..IDENTITIES.len(), 0u32..4), 0..6),
    )
        .prop_map(|(is_source, priority, active, rows)| {
            let role = if is_source { Role::Source } else { Role::Target };
            let collection = Collection::new("", "", role)
                .with_priority(Priority::new(priority).unwrap())
                .with_active(active);
            let records = rows
                .into_iter()
                .map(|(i, quantity)| CardRecord::new(IDENTITIES[i], IDENTITIES[i], quantity))
                .collect();
            (collection, records)
        })
}

fn listings_strategy() -> impl Strategy<Value = Vec<(Collection, Vec<CardRecord>)>> {
    prop::collection::vec(listing_strategy(), 0..7).prop_map(|mut listings| {
        for (i, (collection, _)) in listings.iter_mut().enumerate() {
            collection.id = format!("c{}", i);
            collection.name = format!("Collection {}", i);
        }
        listings
    })
}

fn unit_counts(listings: &[(Collection, Vec<CardRecord>)], role: Role) -> usize {
    listings
        .iter()
        .filter(|(c, _)| c.active && c.role == role)
        .flat_map(|(_, records)| records.iter())
        .map(|r| r.quantity as usize)
        .sum()
}

proptest! {
    #[test]
    fn counts_are_conserved(listings in listings_strategy()) {
        let initially_available = unit_counts(&listings, Role::Source);
        let initially_required = unit_counts(&listings, Role::Target);

        let allocation = ShuffleManager::from_listings(listings).reshuffle().unwrap();
        let allocated = allocation.allocated().count();

        prop_assert_eq!(initially_available, allocation.ditchlist().count() + allocated);
        prop_assert_eq!(initially_required, allocation.buylist().count() + allocated);
    }

    #[test]
    fn allocated_cards_match_a_demand_of_the_same_identity(listings in listings_strategy()) {
        let allocation = ShuffleManager::from_listings(listings.clone()).reshuffle().unwrap();

        // Per (target, identity), allocated units never exceed what the target asked for
        let mut demanded: HashMap<(String, String), usize> = HashMap::new();
        for (collection, records) in listings.iter().filter(|(c, _)| c.active && c.role == Role::Target) {
            for r in records {
                *demanded.entry((collection.id.clone(), r.unique_id.clone())).or_default() += r.quantity as usize;
            }
        }
        let mut supplied: HashMap<(String, String), usize> = HashMap::new();
        for card in allocation.allocated() {
            prop_assert!(card.source.is_some() && card.target.is_some());
            let target = allocation.target_of(card).unwrap();
            prop_assert_eq!(target.role, Role::Target);
            prop_assert_eq!(allocation.source_of(card).unwrap().role, Role::Source);
            *supplied.entry((target.id.clone(), card.unique_id.clone())).or_default() += 1;
        }
        for (key, n) in supplied {
            prop_assert!(n <= demanded.get(&key).copied().unwrap_or(0));
        }
    }

    #[test]
    fn leftovers_never_overlap_within_a_pair(listings in listings_strategy()) {
        let allocation = ShuffleManager::from_listings(listings).reshuffle().unwrap();

        // At the fixed point no leftover held identity is still demanded anywhere
        let held: Vec<&str> = allocation.ditchlist().map(|c| c.unique_id.as_str()).collect();
        for card in allocation.buylist() {
            prop_assert!(!held.contains(&card.unique_id.as_str()));
        }
    }

    #[test]
    fn reruns_are_identical(listings in listings_strategy()) {
        let first = ShuffleManager::from_listings(listings.clone()).reshuffle().unwrap();
        let second = ShuffleManager::from_listings(listings).reshuffle().unwrap();

        prop_assert_eq!(first.allocated_ids(), second.allocated_ids());
        prop_assert_eq!(first.buylist_ids(), second.buylist_ids());
        prop_assert_eq!(first.ditchlist_ids(), second.ditchlist_ids());
        let targets = |a: &card_reshuffle::Allocation| -> Vec<Option<String>> {
            a.allocated().map(|c| a.target_of(c).map(|t| t.id.clone())).collect()
        };
        prop_assert_eq!(targets(&first), targets(&second));
    }
}
