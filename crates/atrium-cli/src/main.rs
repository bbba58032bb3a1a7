//! `atrium`: operator CLI for the Atrium admin dashboard.
//!
//! # Usage
//!
//! ```
//! atrium login 555-0100
//! atrium clients --query acme --status active
//! atrium groups add "VIP"
//! atrium assign-group 12 3
//! atrium --config ~/.config/atrium/atrium.toml whoami
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use atrium_core::{
  Role,
  calendar::{self, DeadlineStatus},
  entity::ClientStatus,
  filter::ClientFilter,
};
use atrium_gateway::{ApiClient, FileCredentialStore, Session};
use atrium_store::DataStore;
use clap::{Parser, Subcommand};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "atrium", author, version, about = "Atrium admin dashboard CLI")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "atrium.toml")]
  config: PathBuf,

  /// Server origin; overrides `base_url` from the config file.
  #[arg(long, env = "ATRIUM_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Sign in and store the token.
  Login {
    phone: String,
    /// Read from stdin when omitted.
    #[arg(long, env = "ATRIUM_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
  /// Forget the stored token and identity.
  Logout,
  /// Show the signed-in identity.
  Whoami,
  /// List clients.
  Clients {
    /// Case-insensitive match on name or email.
    #[arg(short, long, default_value = "")]
    query:  String,
    #[arg(short, long)]
    status: Option<ClientStatus>,
  },
  /// Manage client groups.
  Groups {
    #[command(subcommand)]
    action: GroupAction,
  },
  /// Put a client in a group, or take it out of its group when no group is
  /// given.
  AssignGroup {
    client: String,
    group:  Option<String>,
  },
  /// Change a client's permission level (super admins only).
  SetPermission { client: String, role: Role },
  /// Upcoming document deadlines and events by month.
  Agenda,
}

#[derive(Subcommand)]
enum GroupAction {
  List,
  Add { name: String },
  Rename { id: String, name: String },
  Delete { id: String },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(url) = cli.url {
    settings.base_url = url;
  }

  let client = ApiClient::new(settings.api_config()).context("failed to build HTTP client")?;
  let credentials = FileCredentialStore::new(&settings.credential_path);
  let mut session = Session::new(client, credentials, settings.token_ttl());

  run(cli.command, &mut session).await
}

async fn run(command: Command, session: &mut Session<FileCredentialStore>) -> anyhow::Result<()> {
  // Commands that do not need a restored session.
  match command {
    Command::Login { phone, password } => {
      let password = match password {
        Some(p) => p,
        None => read_password()?,
      };
      let identity = session.login(&phone, &password).await?;
      println!("Signed in as {} ({})", identity.name, identity.role);
      return Ok(());
    }
    Command::Logout => {
      session.logout();
      println!("Signed out");
      return Ok(());
    }
    Command::Agenda => {
      print_agenda(&DataStore::new(session.client().clone()));
      return Ok(());
    }
    _ => {}
  }

  let Some(identity) = session.restore().await.cloned() else {
    bail!("not signed in; run `atrium login <phone>` first");
  };

  let mut store = DataStore::new(session.client().clone());
  store.on_identity_changed(Some(&identity)).await;

  match command {
    Command::Whoami => {
      println!("{} <{}>", identity.name, identity.username);
      println!("role: {} (level {})", identity.role, identity.role.privilege_level());
    }

    Command::Clients { query, status } => {
      let filter = ClientFilter { query, status };
      for c in filter.apply(store.clients()) {
        let group = c
          .group_id
          .as_deref()
          .and_then(|g| store.group(g))
          .map(|g| g.name.as_str())
          .unwrap_or("-");
        println!(
          "{:>6}  {:<24} {:<28} {:<8} {:<11} {}",
          c.id, c.name, c.email, c.status, c.permissions, group
        );
      }
      println!(
        "{} clients, {} active",
        store.clients().len(),
        store.active_client_count()
      );
    }

    Command::Groups { action } => match action {
      GroupAction::List => {
        for g in store.groups() {
          let members = store.clients_in_group(&g.id).len();
          println!("{:>6}  {:<24} {members:>3} clients  since {}", g.id, g.name, g.created_at);
        }
      }
      GroupAction::Add { name } => {
        store.add_group(&name).await;
      }
      GroupAction::Rename { id, name } => {
        store.update_group(&id, &name).await;
      }
      GroupAction::Delete { id } => {
        store.delete_group(&id).await;
      }
    },

    Command::AssignGroup { client, group } => {
      store.update_client_group(&client, group.as_deref()).await;
    }

    Command::SetPermission { client, role } => {
      if !identity.role.can_manage_permissions() {
        bail!("only a super admin can change permissions (you are {})", identity.role);
      }
      store.update_client_permissions(&client, role).await;
    }

    Command::Login { .. } | Command::Logout | Command::Agenda => {}
  }

  let mut failed = false;
  for notice in store.take_notices() {
    if notice.is_error() {
      failed = true;
      eprintln!("{notice}");
    } else {
      println!("{notice}");
    }
  }
  if failed {
    bail!("command did not complete");
  }
  Ok(())
}

fn print_agenda<G>(store: &DataStore<G>)
where
  G: atrium_core::gateway::RemoteGateway,
{
  let today = chrono::Utc::now().date_naive();

  println!("Deadlines");
  for doc in calendar::sort_by_date(store.documents()) {
    let status = deadline_label(DeadlineStatus::classify(doc.deadline, today));
    let number = calendar::document_number(store.documents(), &doc.id).unwrap_or_default();
    println!(
      "  #{number} {} {:<28} {:<7} {status}",
      doc.deadline, doc.name, doc.importance
    );
  }

  for month in calendar::group_by_month(store.events()) {
    println!("\n{}", month.label);
    for event in month.items {
      let sent = if event.sent_to_clients { "sent" } else { "" };
      println!("  {} {:<28} {sent}", event.date, event.title);
    }
  }
}

/// Urgent deadlines are flagged with a leading `!`.
fn deadline_label(status: DeadlineStatus) -> String {
  let label = match status {
    DeadlineStatus::Overdue { days } => format!("overdue by {days}d"),
    DeadlineStatus::DueToday => "due today".to_string(),
    DeadlineStatus::DueSoon { days } | DeadlineStatus::Upcoming { days } => {
      format!("in {days}d")
    }
  };
  if status.is_urgent() { format!("! {label}") } else { label }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
