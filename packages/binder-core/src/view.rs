use serde::{Deserialize, Serialize};

use crate::types::State;

/// Store picker entry that means "no particular store".
pub const BEST_PRICE: &str = "Best Price";

/// Price used for filtering when a card has no applicable price.
const NO_PRICE: f64 = -1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Name,
    Color,
}

#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    pub selected_store: Option<String>,
    pub search: String,
    pub min_price: Option<f64>,
    pub sort: SortMode,
}

impl ViewQuery {
    /// The picker's "Best Price" entry and an empty id both clear the selection.
    pub fn select_store(&mut self, store_id: Option<&str>) {
        self.selected_store = store_id
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != BEST_PRICE)
            .map(str::to_string);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub card_id: String,
    pub name: String,
    pub image_uri: String,
    pub color_bucket: u8,
    pub store_id: Option<String>,
    pub price: Option<f64>,
}

/// Rows to display for the given state and selections.
///
/// With a store selected each row shows that store's price (or none). Without
/// one, each row shows its highest price and the store offering it.
pub fn render(state: &State, query: &ViewQuery) -> Vec<DisplayRow> {
    let needle = query.search.to_lowercase();

    let mut rows: Vec<DisplayRow> = state
        .cards
        .iter()
        .filter(|(_, card)| card.name.to_lowercase().contains(&needle))
        .map(|(card_id, card)| {
            let (store_id, price) = match &query.selected_store {
                Some(store) => (Some(store.clone()), card.prices.get(store).copied()),
                None => match card.best_price() {
                    Some((store, price)) => (Some(store.to_string()), Some(price)),
                    None => (None, None),
                },
            };
            DisplayRow {
                card_id: card_id.clone(),
                name: card.name.clone(),
                image_uri: card.image_uri.clone(),
                color_bucket: card.color_bucket(),
                store_id,
                price,
            }
        })
        .filter(|row| match query.min_price {
            Some(min) => row.price.unwrap_or(NO_PRICE) >= min,
            None => true,
        })
        .collect();

    match query.sort {
        SortMode::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        SortMode::Color => rows.sort_by(|a, b| {
            a.color_bucket
                .cmp(&b.color_bucket)
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardRecord;

    fn card(name: &str, colors: &[&str], prices: &[(&str, f64)]) -> CardRecord {
        let mut card = CardRecord::new(name, format!("https://img/{}.png", name));
        card.color_identity = colors.iter().map(|c| c.to_string()).collect();
        for (store, price) in prices {
            card.prices.insert(store.to_string(), *price);
        }
        card
    }

    fn state(cards: Vec<(&str, CardRecord)>) -> State {
        State {
            store_ids: vec!["A".into(), "B".into(), "C".into()],
            cards: cards.into_iter().map(|(id, c)| (id.to_string(), c)).collect(),
        }
    }

    #[test]
    fn test_best_price_picks_highest() {
        let s = state(vec![("c1", card("Bolt", &["R"], &[("A", 5.0), ("B", 12.0), ("C", 12.0)]))]);
        let rows = render(&s, &ViewQuery::default());
        assert_eq!(rows[0].price, Some(12.0));
        assert_eq!(rows[0].store_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_no_prices_leaves_cell_blank() {
        let s = state(vec![("c1", card("Bolt", &[], &[]))]);
        let rows = render(&s, &ViewQuery::default());
        assert_eq!(rows[0].price, None);
        assert_eq!(rows[0].store_id, None);
    }

    #[test]
    fn test_min_price_filters_best_price_view() {
        let s = state(vec![
            ("c1", card("Bolt", &[], &[("A", 7.0)])),
            ("c2", card("Shock", &[], &[("A", 10.0)])),
        ]);
        let query = ViewQuery {
            min_price: Some(10.0),
            ..Default::default()
        };
        let rows = render(&s, &query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].card_id, "c2");
    }

    #[test]
    fn test_selected_store_without_entry() {
        let s = state(vec![("c1", card("Bolt", &[], &[("A", 7.0)]))]);
        let mut query = ViewQuery::default();
        query.select_store(Some("B"));

        let rows = render(&s, &query);
        assert_eq!(rows[0].store_id.as_deref(), Some("B"));
        assert_eq!(rows[0].price, None);

        query.min_price = Some(-0.5);
        assert!(render(&s, &query).is_empty());

        query.min_price = Some(-1.0);
        assert_eq!(render(&s, &query).len(), 1);
    }

    #[test]
    fn test_best_price_selection_clears_store() {
        let mut query = ViewQuery::default();
        query.select_store(Some("A"));
        assert_eq!(query.selected_store.as_deref(), Some("A"));
        query.select_store(Some(BEST_PRICE));
        assert_eq!(query.selected_store, None);
        query.select_store(Some(""));
        assert_eq!(query.selected_store, None);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let s = state(vec![
            ("c1", card("Lightning Bolt", &[], &[])),
            ("c2", card("Shock", &[], &[])),
        ]);
        let query = ViewQuery {
            search: "BOLT".into(),
            ..Default::default()
        };
        let rows = render(&s, &query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Lightning Bolt");
    }

    #[test]
    fn test_name_sort_is_case_sensitive() {
        let s = state(vec![
            ("c1", card("bolt", &[], &[])),
            ("c2", card("Shock", &[], &[])),
            ("c3", card("Abrade", &[], &[])),
        ]);
        let names: Vec<_> = render(&s, &ViewQuery::default())
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Abrade", "Shock", "bolt"]);
    }

    #[test]
    fn test_color_sort_buckets() {
        let s = state(vec![
            ("c1", card("Giant Growth", &["G"], &[])),
            ("c2", card("Dimir Signet", &["U", "B"], &[])),
            ("c3", card("Sol Ring", &[], &[])),
            ("c4", card("Swords", &["W"], &[])),
            ("c5", card("Forest Bear", &["G"], &[])),
        ]);
        let query = ViewQuery {
            sort: SortMode::Color,
            ..Default::default()
        };
        let names: Vec<_> = render(&s, &query).into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["Swords", "Forest Bear", "Giant Growth", "Dimir Signet", "Sol Ring"]
        );
    }
}
