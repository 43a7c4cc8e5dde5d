//! The demonstration sequence every binding runs
//!
//! Human output matches the classic demo line for line:
//!
//! ```text
//! 1! = 1
//! ...
//! 10! = 3628800
//! Hello, World!
//! hahaha
//! HELLO FROM YAMLSCRIPT!
//! maybe: true
//! sorted: [1,1,2,3,4,5,6,9]
//! ```

use crate::adapter::CoreLibrary;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde::Serialize;

const DEMO_NAME: &str = "World";
const DEMO_REPEAT: (&str, i64) = ("ha", 3);
const DEMO_SHOUT: &str = "hello from yamlscript";
const DEMO_ARRAY: &str = "[3,1,4,1,5,9,2,6]";

/// Everything the demo computed, for machine formats
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub factorials: Vec<FactorialEntry>,
    pub greeting: String,
    pub repeated: String,
    pub maybe: bool,
    pub sorted: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct FactorialEntry {
    pub n: i64,
    pub result: i64,
}

/// Handle the demo command
pub fn handle_demo(library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("demo");
    let human = output.is_human();

    let mut factorials = Vec::with_capacity(10);
    for n in 1..=10 {
        let result = library.factorial(n)?;
        if human {
            output.writeln(&format!("{}! = {}", n, result))?;
        }
        factorials.push(FactorialEntry { n, result });
    }

    let greeting = library.greet(DEMO_NAME)?;
    let (text, count) = DEMO_REPEAT;
    let repeated = library.repeat_string(text, count)?;
    if human {
        output.writeln(&greeting)?;
        output.writeln(&repeated)?;
    }

    library.shout_it(DEMO_SHOUT)?;

    let maybe = library.maybe();
    let sorted = library.sort_json_array(DEMO_ARRAY)?;
    if human {
        output.writeln(&format!("maybe: {}", maybe))?;
        return output.writeln(&format!("sorted: {}", sorted));
    }

    output.data(&DemoReport {
        factorials,
        greeting,
        repeated,
        maybe,
        sorted: serde_json::from_str(&sorted)?,
    })
}
