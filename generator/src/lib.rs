use std::collections::BTreeMap;

use itertools::Itertools;
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use tracing::warn;
use transgen_types::table::{ArrayName, ArrayTable, Entry};

/// Appended to every generated table name.
pub const TABLE_SUFFIX: &str = "_TRANS";

pub struct RustCodeGenerator<'a> {
    lookup_tables: Vec<LookupTable<'a>>,
}

/// ```text
/// 'map_types' =>
///   0 => 'Arabia',
/// ```
///
/// ```text
/// pub static MAP_TYPES_TRANS: phf::Map<i32, &'static str> = phf::phf_map! {
///     0i32 => "Arabia",
/// };
/// ```
struct LookupTable<'a> {
    name: Ident,
    source: &'a ArrayName,
    entries: &'a [Entry],
}

/// Upper-cased array name plus [`TABLE_SUFFIX`].
///
/// ASCII names go through `SHOUTY_SNAKE` case. Other names are upper-cased
/// char by char, with chars that cannot continue an identifier replaced by `_`.
pub fn array_name_to_const_ident(name: &str) -> Ident {
    use heck::ToShoutySnakeCase;
    let stem: String = if name.is_ascii() {
        name.to_shouty_snake_case()
    } else {
        name.chars().map(ident_char_upper).collect()
    };
    let s = format!("{stem}{TABLE_SUFFIX}");
    match syn::parse_str::<syn::Ident>(&s) {
        Ok(_) => format_ident!("{s}"),
        // Names starting with a digit are not identifiers
        Err(_) => format_ident!("_{s}"),
    }
}

fn ident_char_upper(c: char) -> String {
    if syn::parse_str::<syn::Ident>(&format!("_{c}")).is_ok() {
        c.to_uppercase().collect()
    } else {
        "_".to_owned()
    }
}

fn make_lookup_tables(table: &ArrayTable) -> Vec<LookupTable<'_>> {
    table
        .iter()
        .filter(|array| !array.entries.is_empty())
        .map(|array| LookupTable {
            name: array_name_to_const_ident(array.name.as_str()),
            source: &array.name,
            entries: &array.entries,
        })
        .collect()
}

/// Table names claimed by more than one array.
fn name_collisions<'a>(
    lookup_tables: &[LookupTable<'a>],
) -> BTreeMap<String, Vec<&'a ArrayName>> {
    let mut by_ident = lookup_tables
        .iter()
        .fold(BTreeMap::<String, Vec<&ArrayName>>::new(), |mut acc, t| {
            acc.entry(t.name.to_string()).or_default().push(t.source);
            acc
        });
    by_ident.retain(|_, sources| sources.len() > 1);
    by_ident
}

fn warn_name_collisions(lookup_tables: &[LookupTable]) {
    for (ident, sources) in &name_collisions(lookup_tables) {
        warn!(
            ident = %ident,
            arrays = %sources.iter().join(", "),
            "several arrays map to the same table name"
        );
    }
}

fn duplicate_keys(lookup_table: &LookupTable) -> Vec<i32> {
    lookup_table
        .entries
        .iter()
        .map(|e| e.key)
        .duplicates()
        .collect()
}

fn warn_duplicate_keys(lookup_table: &LookupTable) {
    for key in duplicate_keys(lookup_table) {
        warn!(
            array = %lookup_table.source,
            key,
            "duplicate key, phf_map! will reject this table"
        );
    }
}

impl<'a> RustCodeGenerator<'a> {
    pub fn new(table: &'a ArrayTable) -> Self {
        let lookup_tables = make_lookup_tables(table);
        warn_name_collisions(&lookup_tables);
        lookup_tables.iter().for_each(warn_duplicate_keys);
        Self { lookup_tables }
    }

    /// Names of the tables [`Self::out`] declares, in output order.
    pub fn table_names(&self) -> impl Iterator<Item = &Ident> {
        self.lookup_tables.iter().map(|t| &t.name)
    }

    fn gen_lookup_table(&self, lookup_table: &LookupTable) -> TokenStream {
        let LookupTable { name, entries, .. } = lookup_table;
        let entries = entries.iter().map(gen_entry);
        quote! {
            pub static #name: phf::Map<i32, &'static str> = phf::phf_map! {
                #(#entries)*
            };
        }
    }

    pub fn out(&self) -> TokenStream {
        let tables = self
            .lookup_tables
            .iter()
            .map(|lookup_table| self.gen_lookup_table(lookup_table));
        quote! {
            #(#tables)*
        }
    }
}

fn gen_entry(Entry { key, value }: &Entry) -> TokenStream {
    let key = Literal::i32_suffixed(*key);
    let value = Literal::string(value);
    quote! { #key => #value, }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(arrays: Vec<(&str, Vec<(i32, &str)>)>) -> ArrayTable {
        let mut table = ArrayTable::new();
        for (name, entries) in arrays {
            let entries = entries.into_iter().map(|(k, v)| Entry::new(k, v)).collect();
            table.commit(name.into(), entries);
        }
        table
    }

    #[test]
    fn const_idents() {
        assert_eq!(array_name_to_const_ident("map_types"), "MAP_TYPES_TRANS");
        assert_eq!(array_name_to_const_ident("GREETING"), "GREETING_TRANS");
        assert_eq!(array_name_to_const_ident("game speeds"), "GAME_SPEEDS_TRANS");
        assert_eq!(array_name_to_const_ident("2v2"), "_2V2_TRANS");
    }

    #[test]
    fn non_ascii_const_idents() {
        assert_eq!(array_name_to_const_ident("日本"), "日本_TRANS");
        assert_eq!(array_name_to_const_ident("straße"), "STRASSE_TRANS");
        assert_eq!(array_name_to_const_ident("Ⅻ"), "Ⅻ_TRANS");
        assert_eq!(array_name_to_const_ident("x\u{b2}"), "X__TRANS");
        assert_ne!(
            array_name_to_const_ident("x\u{b2}"),
            array_name_to_const_ident("x")
        );
        assert_eq!(array_name_to_const_ident("½"), "__TRANS");
        assert_eq!(
            array_name_to_const_ident("carte du monde é"),
            "CARTE_DU_MONDE_É_TRANS"
        );
    }

    #[test]
    fn colliding_names_are_grouped() {
        let table = table(vec![
            ("a b", vec![(1, "x")]),
            ("a_b", vec![(2, "y")]),
            ("c", vec![(3, "z")]),
        ]);
        let lookup_tables = make_lookup_tables(&table);
        let collisions = name_collisions(&lookup_tables);
        assert_eq!(collisions.len(), 1);
        let names: Vec<_> = collisions["A_B_TRANS"].iter().map(|n| n.as_str()).collect();
        assert_eq!(names, ["a b", "a_b"]);
    }

    #[test]
    fn duplicate_keys_are_reported_once() {
        let table = table(vec![("dup", vec![(1, "x"), (2, "y"), (1, "z"), (1, "w")])]);
        let lookup_tables = make_lookup_tables(&table);
        assert_eq!(duplicate_keys(&lookup_tables[0]), [1]);
    }

    #[test]
    fn emits_one_static_per_table() {
        let table = table(vec![
            ("GREETING", vec![(1, "hello"), (2, "world")]),
            ("FAREWELL", vec![(9, "bye")]),
        ]);
        let out = RustCodeGenerator::new(&table).out().to_string();
        let expected = quote! {
            pub static GREETING_TRANS: phf::Map<i32, &'static str> = phf::phf_map! {
                1i32 => "hello",
                2i32 => "world",
            };
            pub static FAREWELL_TRANS: phf::Map<i32, &'static str> = phf::phf_map! {
                9i32 => "bye",
            };
        };
        assert_eq!(out, expected.to_string());
    }

    #[test]
    fn skips_empty_tables() {
        let table = table(vec![("EMPTY", vec![]), ("FULL", vec![(0, "x")])]);
        let generator = RustCodeGenerator::new(&table);
        let names: Vec<_> = generator.table_names().map(ToString::to_string).collect();
        assert_eq!(names, ["FULL_TRANS"]);
        assert!(!generator.out().to_string().contains("EMPTY"));
    }

    #[test]
    fn values_are_rust_escaped() {
        let entry = Entry::new(3, "say \"hi\" \\ now");
        let tokens = gen_entry(&entry).to_string();
        assert!(tokens.contains(r#""say \"hi\" \\ now""#), "{tokens}");
    }

    #[test]
    fn deterministic() {
        let table = table(vec![("a", vec![(1, "x"), (1, "y")]), ("b", vec![(-4, "neg")])]);
        let first = RustCodeGenerator::new(&table).out().to_string();
        let second = RustCodeGenerator::new(&table).out().to_string();
        assert_eq!(first, second);
    }
}
