//! Handlers for the single-operation commands

use crate::adapter::CoreLibrary;
use crate::cli::{FactorialArgs, GreetArgs, MaybeArgs, RepeatArgs, ShoutArgs, SortArgs};
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde::Serialize;

/// Machine-readable record of one call
#[derive(Debug, Serialize)]
pub struct CallRecord<'a, I: Serialize, R: Serialize> {
    pub operation: &'a str,
    pub input: I,
    pub result: R,
}

/// Handle the factorial command
pub fn handle_factorial(
    args: FactorialArgs,
    library: &CoreLibrary,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("factorial");
    let result = library.factorial(args.n)?;

    output.result(
        &format!("{}! = {}", args.n, result),
        &CallRecord {
            operation: "factorial",
            input: args.n,
            result,
        },
    )
}

/// Handle the greet command
pub fn handle_greet(args: GreetArgs, library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("greet");
    let greeting = library.greet(&args.name)?;

    output.result(
        &greeting,
        &CallRecord {
            operation: "greet",
            input: &args.name,
            result: &greeting,
        },
    )
}

#[derive(Debug, Serialize)]
struct RepeatInput<'a> {
    text: &'a str,
    count: i64,
}

/// Handle the repeat command
pub fn handle_repeat(args: RepeatArgs, library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("repeat_string");
    let repeated = library.repeat_string(&args.text, args.count)?;

    output.result(
        &repeated,
        &CallRecord {
            operation: "repeat_string",
            input: RepeatInput {
                text: &args.text,
                count: args.count,
            },
            result: &repeated,
        },
    )
}

/// Handle the shout command
///
/// The library writes to stdout itself. Machine formats get a record with no
/// result after that line.
pub fn handle_shout(args: ShoutArgs, library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("shout_it");
    library.shout_it(&args.message)?;

    if output.is_human() {
        return Ok(());
    }
    output.data(&CallRecord {
        operation: "shout_it",
        input: &args.message,
        result: (),
    })
}

/// Handle the maybe command
pub fn handle_maybe(args: MaybeArgs, library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("maybe");
    if args.entropy {
        library.reseed_from_entropy();
    } else if let Some(seed) = args.seed {
        library.seed_random(seed);
    }

    let flips: Vec<bool> = (0..args.times).map(|_| library.maybe()).collect();
    let human = flips
        .iter()
        .map(|flip| flip.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    if let [single] = flips.as_slice() {
        output.result(
            &human,
            &CallRecord {
                operation: "maybe",
                input: args.seed,
                result: *single,
            },
        )
    } else {
        output.result(
            &human,
            &CallRecord {
                operation: "maybe",
                input: args.seed,
                result: &flips,
            },
        )
    }
}

/// Handle the sort command
pub fn handle_sort(args: SortArgs, library: &CoreLibrary, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("sort_json_array");
    let sorted = library.sort_json_array(&args.json)?;

    // Machine formats nest the array rather than a string holding it
    let value: serde_json::Value = serde_json::from_str(&sorted)?;
    output.result(
        &sorted,
        &CallRecord {
            operation: "sort_json_array",
            input: &args.json,
            result: value,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use crate::test_support::{buffered_writer, require_library};
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use sobind_core::ErrorCode;

    #[test]
    fn test_call_record_shape() {
        let record = CallRecord {
            operation: "factorial",
            input: 5,
            result: 120,
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"operation":"factorial","input":5,"result":120}"#
        );
    }

    #[test]
    fn test_factorial_human_and_error() {
        let library = require_library!();

        let (mut out, buffer) = buffered_writer(OutputFormat::Human, false);
        handle_factorial(FactorialArgs { n: 5 }, &library, &mut out).unwrap();
        assert_eq!(buffer.contents(), "5! = 120\n");

        let (mut out, buffer) = buffered_writer(OutputFormat::Human, false);
        let err = handle_factorial(FactorialArgs { n: 21 }, &library, &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::Adapter(adapter::Error::Core {
                code: ErrorCode::Overflow,
                ..
            })
        ));
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_sort_json_output_nests_array() {
        let library = require_library!();

        let (mut out, buffer) = buffered_writer(OutputFormat::Json, false);
        handle_sort(
            SortArgs {
                json: "[3,1,2.5]".to_string(),
            },
            &library,
            &mut out,
        )
        .unwrap();
        assert_eq!(
            buffer.contents(),
            "{\"operation\":\"sort_json_array\",\"input\":\"[3,1,2.5]\",\"result\":[1,2.5,3]}\n"
        );
    }

    #[test]
    fn test_repeat_and_greet_human() {
        let library = require_library!();

        let (mut out, buffer) = buffered_writer(OutputFormat::Human, false);
        handle_greet(
            GreetArgs {
                name: "Ada".to_string(),
            },
            &library,
            &mut out,
        )
        .unwrap();
        handle_repeat(
            RepeatArgs {
                text: "ab".to_string(),
                count: 3,
            },
            &library,
            &mut out,
        )
        .unwrap();
        assert_eq!(buffer.contents(), "Hello, Ada!\nababab\n");
    }

    #[test]
    #[serial]
    fn test_seeded_maybe_output_is_reproducible() {
        let library = require_library!();
        let args = || MaybeArgs {
            seed: Some(99),
            entropy: false,
            times: 8,
        };

        let (mut out, first) = buffered_writer(OutputFormat::Json, false);
        handle_maybe(args(), &library, &mut out).unwrap();
        let (mut out, second) = buffered_writer(OutputFormat::Json, false);
        handle_maybe(args(), &library, &mut out).unwrap();
        library.reseed_from_entropy();

        assert_eq!(first.contents(), second.contents());
        let record: serde_json::Value = serde_json::from_str(&first.contents()).unwrap();
        assert_eq!(record["result"].as_array().unwrap().len(), 8);
    }

    #[test]
    #[serial]
    fn test_entropy_overrides_configured_seed() {
        let library = require_library!();
        let flips = |entropy| {
            library.seed_random(5);
            let args = MaybeArgs {
                seed: None,
                entropy,
                times: 64,
            };
            let (mut out, buffer) = buffered_writer(OutputFormat::Json, false);
            handle_maybe(args, &library, &mut out).unwrap();
            buffer.contents()
        };

        let seeded = flips(false);
        assert_eq!(seeded, flips(false));
        // 64 fresh flips matching the seeded stream has probability 2^-64
        assert_ne!(seeded, flips(true));
        library.reseed_from_entropy();
    }
}
