//! Paws CLI composition root
//!
//! Loads `paws.toml`, wires adapters into a [`DiscoveryRuntime`],
//! and runs a stdin/stdout REPL over the discovery flow.

mod bootstrap;
mod command;
mod config;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use paws_runtime::{
    DiscoveryRuntime,
    core::types::{ImagePayload, Pet, PetDraft},
};

use crate::command::{Command, HELP, set_draft_field};

/// Paws: browse adoptable pets from the terminal.
#[derive(Parser, Debug)]
#[command(name = "paws", version, about)]
struct Cli {
    /// Path to the client configuration file.
    #[arg(short, long, default_value = "paws.toml")]
    config: String,
}

/// Read an image from disk; the content type follows the extension.
async fn read_image(path: &str) -> eyre::Result<ImagePayload> {
    let bytes = tokio::fs::read(path).await.wrap_err_with(|| format!("cannot read image '{path}'"))?;
    let path = Path::new(path);
    let file_name =
        path.file_name().and_then(|n| n.to_str()).unwrap_or("pet.jpg").to_string();
    let content_type = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
    {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "image/jpeg",
    };
    Ok(ImagePayload { file_name, content_type: content_type.to_string(), bytes })
}

fn pet_line(pet: &Pet, favorite: bool) -> String {
    format!(
        "{star} {id:<26} {name:<12} {species}/{breed}  {gender}  {color}  age {age}{adopted}",
        star = if favorite { '*' } else { ' ' },
        id = pet.id,
        name = pet.name,
        species = pet.species,
        breed = pet.breed,
        gender = pet.gender,
        color = pet.color,
        age = pet.age,
        adopted = if pet.available { "" } else { "  (adopted)" },
    )
}

/// Run the interactive REPL loop.
#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "CLI REPL must use stdout/stderr for user interaction"
)]
async fn repl(runtime: DiscoveryRuntime) {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut draft = PetDraft::default();

    match runtime.load_catalog().await {
        Ok(count) => eprintln!("Loaded {count} pets."),
        Err(e) => eprintln!("Could not load pets: {e}"),
    }
    if runtime.session().is_logged_in() {
        if let Err(e) = runtime.refresh_favorites().await {
            eprintln!("Could not load favorites: {e}");
        }
    } else {
        eprintln!("Not logged in: browsing only. Set [session] user_id to favorite or post.");
    }
    eprintln!("Type /help for commands. /quit to exit.\n");

    loop {
        eprint!("> ");
        let _ = tokio::io::AsyncWriteExt::flush(&mut tokio::io::stderr()).await;

        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                eprintln!("stdin error: {e}");
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let cmd = match Command::parse(input) {
            Ok(cmd) => cmd,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        let favorites = runtime.favorites();
        let print_pets = |pets: &[Pet]| {
            if pets.is_empty() {
                println!("(no pets)");
            }
            for pet in pets {
                println!("{}", pet_line(pet, favorites.contains(&pet.id)));
            }
        };

        match cmd {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::List => print_pets(&runtime.visible()),
            Command::Search(text) => {
                runtime.set_query(text);
                print_pets(&runtime.visible());
            }
            Command::Gender(value) => {
                runtime.set_gender(value);
                print_pets(&runtime.visible());
            }
            Command::Color(value) => {
                runtime.set_color(value);
                print_pets(&runtime.visible());
            }
            Command::Reset => {
                runtime.reset_filters();
                if let Err(e) = runtime.load_catalog().await {
                    eprintln!("Error: {e}");
                }
                print_pets(&runtime.visible());
            }
            Command::Show(id) => match runtime.pet(&id) {
                Some(pet) => {
                    println!("{}", pet_line(&pet, favorites.contains(&pet.id)));
                    println!("  {}  size {}", pet.description, pet.size);
                    if let Some(url) = &pet.image_url {
                        println!("  image: {url}");
                    }
                    match runtime.owner_of(&id).await {
                        Ok(owner) => println!("  owner: {}", owner.username),
                        Err(e) => eprintln!("  owner unavailable: {e}"),
                    }
                }
                None => eprintln!("no pet with id {id}"),
            },
            Command::Favorite(id) => match runtime.toggle_favorite(&id).await {
                Ok(change) if change.favorite => println!("Added {id} to favorites."),
                Ok(_) => println!("Removed {id} from favorites."),
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Favorites => match runtime.refresh_favorites().await {
                Ok(pets) => {
                    for pet in &pets {
                        println!("{}", pet_line(pet, true));
                    }
                    if pets.is_empty() {
                        println!("(no favorites)");
                    }
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Interest(id) => match runtime.express_interest(&id).await {
                Ok(ack) => println!("{}", ack.message),
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Adopters(id) => match runtime.interested_adopters(&id).await {
                Ok(adopters) if adopters.is_empty() => println!("No interested adopters found"),
                Ok(adopters) => {
                    for a in adopters {
                        println!("{}  {}", a.username, a.email.as_deref().unwrap_or("-"));
                    }
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Labels(labels) => {
                let guess = runtime.suggest_from_labels(&mut draft, labels);
                if guess.is_match() {
                    println!("species: {}  breed: {}", guess.species, guess.breed);
                } else {
                    println!("no known species in labels");
                }
            }
            Command::Analyze(path) => {
                let image = match read_image(&path).await {
                    Ok(image) => image,
                    Err(e) => {
                        eprintln!("Error: {e:#}");
                        continue;
                    }
                };
                match runtime.suggest_for_image(&mut draft, &image).await {
                    Ok(s) => {
                        println!("labels: {}", s.guess.labels.join(", "));
                        if s.guess.is_match() {
                            println!("species: {}  breed: {}", s.guess.species, s.guess.breed);
                        } else {
                            println!("no known species in labels");
                        }
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Command::Draft => println!("{draft:#?}"),
            Command::Set { field, value } => {
                if let Err(msg) = set_draft_field(&mut draft, &field, &value) {
                    eprintln!("{msg}");
                }
            }
            Command::Post(path) => {
                let image = match read_image(&path).await {
                    Ok(image) => image,
                    Err(e) => {
                        eprintln!("Error: {e:#}");
                        continue;
                    }
                };
                match runtime.submit_pet(&draft, &image).await {
                    Ok(()) => {
                        println!("Pet posted successfully");
                        draft.reset();
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Command::Mine => match runtime.my_pets().await {
                Ok(pets) => print_pets(&pets),
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Available { pet, available } => {
                match runtime.set_availability(&pet, available).await {
                    Ok(()) => println!("Pet status updated successfully"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Command::Delete(id) => match runtime.delete_pet(&id).await {
                Ok(()) => println!("Deleted {id}."),
                Err(e) => eprintln!("Error: {e}"),
            },
        }
    }

    eprintln!("\nGoodbye!");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)
        .wrap_err_with(|| format!("failed to load config from '{}'", cli.config))?;

    let runtime = bootstrap::build_runtime(&cfg).await?;

    repl(runtime).await;

    Ok(())
}
