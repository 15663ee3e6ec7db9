// Prototype demo client: clone a prototype whose companion points back at it,
// then report what was copied, cloned and relinked.

use design_patterns::logging;
use design_patterns::prototype::{self, layered};

fn main() {
    logging::init();

    prototype::run_demo().print();

    println!();
    println!("{}", layered::run_demo().colored());
}
