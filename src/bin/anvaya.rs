//!
//! anvaya CLI binary
//! ------------------
//! Interactive client for the Anvaya clinic service. Restores any stored
//! session on startup, then runs a read-eval loop of role-gated commands
//! against the remote service.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};

use anvaya::cli::Repl;
use anvaya::client::ApiClient;
use anvaya::config::{Config, StoreKind};
use anvaya::session::SessionManager;
use anvaya::token_store;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--url <base>] [--store keyring|file] [--token-file <path>] [--login <email> <password>] [--command \"<cmd>\"]\n\nFlags:\n  --url <base>             Service base URL (default: env ANVAYA_API_URL or the hosted service)\n  --store keyring|file     Credential store backend (default: env ANVAYA_TOKEN_STORE or file)\n  --token-file <path>      Token file location for the file backend\n  --login <email> <pw>     Sign in right after the startup restore\n  -c, --command \"<cmd>\"    Run one command before entering the prompt\n  -h, --help               Show this help\n\nInteractive commands: type 'help' at the prompt."
    );
}

fn main() -> Result<()> {
    println!("anvaya clinic client");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut config = Config::from_env();
    let mut login: Option<(String, String)> = None;
    let mut command: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => {
                if i + 1 >= args.len() { eprintln!("--url requires a value"); print_usage(&program); std::process::exit(2); }
                config.base_url = args[i + 1].clone();
                i += 2; continue;
            }
            "--store" => {
                if i + 1 >= args.len() { eprintln!("--store requires a value"); print_usage(&program); std::process::exit(2); }
                match StoreKind::parse(&args[i + 1]) {
                    Some(kind) => config.store = kind,
                    None => { eprintln!("--store must be 'keyring' or 'file'"); std::process::exit(2); }
                }
                i += 2; continue;
            }
            "--token-file" => {
                if i + 1 >= args.len() { eprintln!("--token-file requires a value"); print_usage(&program); std::process::exit(2); }
                config.token_file = args[i + 1].clone().into();
                i += 2; continue;
            }
            "--login" => {
                if i + 2 >= args.len() { eprintln!("--login requires <email> <password>"); print_usage(&program); std::process::exit(2); }
                login = Some((args[i + 1].clone(), args[i + 2].clone()));
                i += 3; continue;
            }
            "--command" | "-c" => {
                if i + 1 >= args.len() { eprintln!("--command requires a value"); print_usage(&program); std::process::exit(2); }
                command = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let store = token_store::open_default(&config);
    let client = ApiClient::new(config.base_url.clone(), store.clone());
    let session = SessionManager::new(client.clone(), store);
    let repl = Repl::new(client, session);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // Settle the session before the first prompt
    rt.block_on(repl.session().restore());
    match repl.session().current_user() {
        Some(user) => println!("session restored: {} <{}>", user.name, user.email),
        None => println!("not signed in"),
    }

    if let Some((email, password)) = login {
        rt.block_on(repl.login(&email, &password));
    }
    if let Some(cmd) = command {
        let _ = rt.block_on(repl.handle(&cmd));
    }

    println!("type 'help' for commands.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        if stdin.read_line(&mut input).is_err() { break; }
        if input.is_empty() { break; }
        if !rt.block_on(repl.handle(&input)) { break; }
    }
    Ok(())
}
