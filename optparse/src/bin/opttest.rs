// Test runner: parses its arguments against a fixed table and prints what
// it found, one line per option occurrence and per positional argument.

use optparse::*;

const UNKNOWN: usize = 0;
const HELP: usize = 1;
const NONE: usize = 2;
const OPTIONAL: usize = 3;
const REQUIRED: usize = 4;
const NONEMPTY: usize = 5;
const NUMERIC: usize = 6;
const PORT: usize = 7;
const VERBOSITY: usize = 8;

const LOUD: i32 = 1;
const QUIET: i32 = -1;

const USAGE: &[Descriptor] = &[
    Descriptor::new(UNKNOWN, "", "", Check::Unknown, "USAGE: opttest [options] [<arg> [<more args>]]\n\nOptions:"),
    Descriptor::new(HELP, "h", "help", Check::None, "  -h, --help  \tPrint usage and exit."),
    Descriptor::new(NONE, "e", "none", Check::None, "  -e, --none  \tNo value should be given."),
    Descriptor::new(OPTIONAL, "o", "optional", Check::Optional, "  -o[ <val>], --optional[=<val>]  \tAccepts an optional value."),
    Descriptor::new(REQUIRED, "r", "required", Check::Required, "  -r <val>, --required=<val>  \tMust be given a possibly empty value."),
    Descriptor::new(NONEMPTY, "n", "nonempty", Check::NonEmpty, "  -n <val>, --nonempty=<val>  \tMust be given a non-empty value."),
    Descriptor::new(NUMERIC, "u", "numeric", Check::Numeric, "  -u <val>, --numeric=<val>  \tMust be given a numeric value."),
    Descriptor::new(PORT, "p", "port", Check::All(&[Check::NonEmpty, Check::Numeric]), "  -p <n>, --port=<n>  \tPort number."),
    Descriptor::new(VERBOSITY, "v", "verbose", Check::None, "  -v, --verbose  \tMore output; repeatable.").with_kind(LOUD),
    Descriptor::new(VERBOSITY, "q", "quiet", Check::None, "  -q, --quiet  \tLess output; repeatable.").with_kind(QUIET),
    Descriptor::new(UNKNOWN, "", "", Check::None, "\nMandatory option indices can be listed in OPTTEST_MANDATORY."),
    Descriptor::END,
];

fn mandatory_from_env() -> Vec<usize> {
    let list = match std::env::var("OPTTEST_MANDATORY") {
        Ok(list) => list,
        Err(_) => return Vec::new(),
    };
    let mut indices = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item.parse() {
            Ok(index) => indices.push(index),
            Err(_) => fatal(&format!("OPTTEST_MANDATORY: bad index '{}'", item)),
        }
    }
    indices
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let posixly_correct = std::env::var_os("POSIXLY_CORRECT").is_some();

    let app = App::new(USAGE)
        .parser(Parser::new(USAGE).gnu(!posixly_correct))
        .help(HELP)
        .mandatory(&mandatory_from_env());
    let parsed = app.parse_or_exit(&args);

    for occ in parsed.occurrences() {
        match occ.arg() {
            Some(arg) => println!("option {} {} = '{}'", occ.index().unwrap_or(UNKNOWN), occ.name(), arg),
            None => println!("option {} {}", occ.index().unwrap_or(UNKNOWN), occ.name()),
        }
    }
    for arg in parsed.positional() {
        println!("positional '{}'", arg);
    }

    let level: i32 = parsed.group(VERBOSITY).iter().map(Occurrence::kind).sum();
    if level != 0 {
        println!("verbosity {}", level);
    }
}
