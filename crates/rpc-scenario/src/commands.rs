use clap::Parser;
use clap::Subcommand;

const LONG_ABOUT: &str = r#"rpc-scenario sends JSON-RPC 2.0 requests built from key=value fixture
rows and checks the result against expected rows.

KEYS:
    Keys address nested locations with brackets: filter[name], items[0][id].

VALUES:
    @true, @false        booleans
    @null                null (expectations only)
    @notNull             any present, non-null value (expectations only)
    @[a, b, c]           list of strings; @[] is an empty list
    anything else        a string; JSON numbers compare by their text

EXAMPLES:
    rpc-scenario --url http://localhost:8080/json-rpc call app -p name=x -p filter[tags]=@[a,b]
    rpc-scenario call app -p name=x --expect name=x --count 1
    rpc-scenario call list --expect items[0][id]=@notNull --all"#;

#[derive(Parser, Debug)]
#[command(name = "rpc-scenario")]
#[command(author, version)]
#[command(about = "Send table-driven JSON-RPC requests and check the responses")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON-RPC endpoint (default: RPC_SCENARIO_BASE_URL or http://localhost)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Request timeout in milliseconds (default: RPC_SCENARIO_TIMEOUT_MS or 30000)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Extra request header, as 'Name: value'
    #[arg(short = 'H', long = "header", global = true, value_parser = parse_header_arg)]
    pub headers: Vec<(String, String)>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one request and print the response envelope
    #[command(long_about = r#"Send one request and print the response envelope.

Parameters are encoded by the fixture codec. With --expect or --count the
result is compared after printing; the first failing row stops the check
unless --all is given.

EXAMPLES:
    rpc-scenario call health
    rpc-scenario call app -p user[name]=x -p user[active]=@true
    rpc-scenario call app -p name=x --expect name=x
    rpc-scenario call search --count 3 --expect items[0]=@notNull"#)]
    Call {
        /// Method name
        method: String,

        /// Request parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Request id (integers are sent as numbers)
        #[arg(long)]
        id: Option<String>,

        /// Expected result row as key=value (repeatable)
        #[arg(short = 'e', long = "expect")]
        expect: Vec<String>,

        /// Expected number of elements in the result
        #[arg(long)]
        count: Option<usize>,

        /// Report every failing row instead of the first
        #[arg(long)]
        all: bool,
    },
}

fn parse_header_arg(raw: &str) -> Result<(String, String), String> {
    crate::config::parse_header(raw).ok_or_else(|| format!("expected 'Name: value', got {raw:?}"))
}
