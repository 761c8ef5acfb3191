//! English lookup tables, generated at build time from `ageofempires.php`.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));
