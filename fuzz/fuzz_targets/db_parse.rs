#![no_main]

//! Fuzz target for database and `.config` parsing.
//!
//! Arbitrary bytes go through the TOML loader; when a database loads, the second half of the
//! input is fed to the `.config` reader and the result is rendered back.

use kraise_model::ConfigDb;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let split = data.len() / 2;
    let (db_bytes, config_bytes) = data.split_at(split);

    let Ok(db_text) = std::str::from_utf8(db_bytes) else {
        return;
    };
    let Ok(mut db) = ConfigDb::from_toml_str(db_text) else {
        return;
    };

    let config_text = String::from_utf8_lossy(config_bytes);
    let _ = db.load_config_str(&config_text);
    let rendered = db.render_config(None);

    // Whatever we render must load back without disturbing a single value.
    let mut reloaded = db.clone();
    reloaded.load_config_str(&rendered);
    assert_eq!(reloaded.render_config(None), rendered);
});
