use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// String-keyed map that remembers the order in which keys first appeared.
///
/// Values live in an arena (`entries`) and a hash index points into it, so
/// lookups are O(1) and iteration follows first-insertion order.
#[derive(Debug, Clone)]
struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V> OrderedMap<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), make()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::default();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            // Later duplicates overwrite, as in a plain JSON object.
            *map.entry_or_insert_with(&key, || None) = Some(value);
        }
        Ok(OrderedMap {
            entries: map
                .entries
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
            index: map.index,
        })
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Accumulated spend per currency code.
///
/// A currency appears only once at least one expense line in it was seen;
/// keys iterate in order of first occurrence. Serializes as a plain JSON
/// object (`{"USD": 150.0, "EUR": 60.0}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTotals(OrderedMap<f64>);

impl CurrencyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running total for `currency`, starting it at 0.
    pub fn add(&mut self, currency: &str, amount: f64) {
        *self.0.entry_or_insert_with(currency, || 0.0) += amount;
    }

    /// Total for a currency, or `None` if no line in it was seen.
    #[must_use]
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).copied()
    }

    /// Fold another set of totals into this one.
    pub fn merge(&mut self, other: &CurrencyTotals) {
        for (currency, amount) in other.iter() {
            self.add(currency, amount);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// `(currency, total)` pairs in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Currency codes in order of first occurrence.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k)
    }
}

/// Currency totals per asset, keyed by the **lowercased** asset name.
///
/// `"ETH"` and `"eth"` share one entry here even though they are listed as
/// separate assets elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpensesByAsset(OrderedMap<CurrencyTotals>);

impl ExpensesByAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` in `currency` to the bucket of `asset` (lowercased here).
    pub fn add(&mut self, asset: &str, currency: &str, amount: f64) {
        self.0
            .entry_or_insert_with(&asset.to_lowercase(), CurrencyTotals::new)
            .add(currency, amount);
    }

    /// Totals for an asset; the lookup is lowercased like the keys.
    #[must_use]
    pub fn get(&self, asset: &str) -> Option<&CurrencyTotals> {
        self.0.get(&asset.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    /// `(lowercased asset, totals)` pairs in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurrencyTotals)> {
        self.0.iter()
    }
}
