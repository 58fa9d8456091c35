use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per test binary.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

/// Fixture dataset in the source shape, including the quirks the
/// pipeline has to absorb: duplicates, non-breaking-space keys, unknown
/// locations, invalid genders and missing stats.
pub const SAMPLE_DATASET: &str = r#"[
  {"Name": "Nazeem", "Home City": "Whiterun", "Race": "Redguard", "Gender": "Male",
   "Class": "Citizen", "Morality": "Any crime", "Aggression": "Unaggressive",
   "Faction(s)": "Cloud District Faction", "Primary Skills": "Speech, Pickpocket",
   "Health": "90", "Magicka": 50, "Stamina": 50},
  {"Name": "Calcelmo", "Location": "Left Hand Mine, Cell 3", "Race": "Altmer", "Gender": "Male",
   "Class": "Mage", "Morality": "No crime", "Aggression": "Aggressive",
   "Primary Skills": "Destruction", "Health": 10, "Magicka": 300},
  {"Name": "Wanderer", "Location": "Atmora", "Race": "Nord", "Gender": "Male", "Health": 5},
  {"Name": "Lydia", "Home\u00a0Town": "Whiterun", "Race": "Nord", "Gender": "Female",
   "Class": "Warrior", "Faction(s)": "Dragonsreach; Housecarl", "Primary Skills": "Heavy Armor",
   "Health": 304, "Stamina": "170"},
  {"Name": "Lydia", "Home City": "Riften", "Race": "Nord", "Gender": "Female", "Health": 999},
  {"Name": "Spirit", "Home City": "Riften", "Race": "Nord", "Gender": "Radiant", "Health": 40},
  {"Name": "Mjoll", "Home City": "Riften", "Race": "Nord", "Gender": "Female",
   "Class": "Warrior", "Health": 30},
  {"Name": "Brynjolf", "Location": "The Ratway", "Race": "Nord", "Gender": "Male",
   "Class": "Thief"}
]"#;

fn setup_test_logging() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "debug");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["config", "tokio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
