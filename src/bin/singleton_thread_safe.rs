// Thread-safe Singleton demo client: two threads race to create the instance
// with different values; both should print the same one.

use design_patterns::singleton_sync::{self, RACE_HEADER};
use design_patterns::{logging, PatternError, RaceConfig};
use std::time::Duration;

fn main() -> Result<(), PatternError> {
    logging::init();

    println!("{RACE_HEADER}");

    let config = RaceConfig::default().start_delay(Duration::from_millis(100));
    let outcome = singleton_sync::race(&config)?;

    for observation in &outcome.observations {
        println!("{}", observation.value);
    }

    println!();
    println!("{}", outcome.verdict().colored());
    Ok(())
}
