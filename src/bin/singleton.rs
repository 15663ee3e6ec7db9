// Non-synchronized Singleton demo client.

use design_patterns::{logging, singleton};

fn main() {
    logging::init();

    println!("{}", singleton::run_demo().colored());
}
