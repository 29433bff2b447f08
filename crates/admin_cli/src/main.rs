use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Actor, CreateUserCmd, Engine, Role, UserFilter, UserStatus};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "cashbook_admin")]
#[command(about = "Admin utilities for Cashbook (bootstrap and inspect users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./cashbook.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the first administrator.
    BootstrapAdmin(BootstrapArgs),
    /// Print every user, as seen by an existing administrator.
    ListUsers(ListArgs),
}

#[derive(Args, Debug)]
struct BootstrapArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Email of the administrator running the listing.
    #[arg(long)]
    admin_email: String,
    /// Substring of the name or email.
    #[arg(long)]
    query: Option<String>,
    #[arg(long, value_parser = parse_role)]
    role: Option<Role>,
    #[arg(long, value_parser = parse_status)]
    status: Option<UserStatus>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<UserStatus, String> {
    UserStatus::try_from(raw).map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::BootstrapAdmin(args) => {
            let mut cmd = CreateUserCmd::new(args.email);
            if let Some(name) = args.name {
                cmd = cmd.display_name(name);
            }
            if let Some(phone) = args.phone {
                cmd = cmd.phone(phone);
            }

            match engine.bootstrap_admin(cmd).await {
                Ok(user) => println!("created administrator: {} ({})", user.email, user.id),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::ListUsers(args) => {
            let Some(admin) = engine.find_user_by_email(&args.admin_email).await? else {
                eprintln!("user not found: {}", args.admin_email);
                std::process::exit(1);
            };

            let actor = Actor::new(admin.id, admin.role);
            let filter = UserFilter {
                query: args.query,
                role: args.role,
                status: args.status,
            };
            let users = match engine.list_users(&actor, &filter).await {
                Ok(users) => users,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            for user in users {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    user.id,
                    user.email,
                    user.display_name,
                    user.role.as_str(),
                    user.status.as_str()
                );
            }
        }
    }

    Ok(())
}
