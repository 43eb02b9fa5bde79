//! Terminal front-end for the Farmart storefront.
//!
//! Wires the stores from configuration and drives them with line commands,
//! one per view action. Type `help` for the list.

use std::error::Error;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use farmart::adapters::contact::UnconfiguredMailer;
use farmart::adapters::{
    EmailJsConfig, EmailJsMailer, FileTokenStore, GatewayConfig, InMemoryTokenStore,
    ReqwestGateway, TracingNotifier,
};
use farmart::application::{ClientError, PollerConfig, Storefront, StorefrontPorts};
use farmart::config::{AppConfig, LogFormat, LoggingConfig};
use farmart::domain::catalog::{Animal, AnimalType, ImageUpload, NewListing};
use farmart::domain::contact::{ContactMessage, Portal};
use farmart::domain::foundation::{AnimalId, OrderId, OrderStatus, UserType};
use farmart::domain::navigation::Route;
use farmart::domain::session::Registration;
use farmart::ports::{ContactMailer, Notice, NoticeLevel, Notifier, TokenStore};

const HELP: &str = "\
commands:
  goto <path>                          resolve a view (/, /shop, /auth, /my-orders, /contact, /seller/...)
  login <username> <password> [buyer|farmer]
  register <buyer|farmer> <username> <email> <password> <phone> <location>
  logout
  animals                              list the catalog
  add <animal_id> | remove <animal_id> | cart | checkout
  orders                               list your orders
  pay <order_id> <phone>               start M-Pesa payment and watch for confirmation
  cancel <order_id>
  listings                             your listings (farmer)
  sell <name> <type> <breed> <age_months> <price> <quantity> <description...> [@image_path]
  unlist <animal_id>
  status <order_id> <confirm|reject>   decide on an incoming order (farmer)
  stats                                seller dashboard metrics
  contact <buyer|seller> <name> <email> <message...>
  quit";

/// Prints notices to the terminal and records them in the log stream.
struct ConsoleNotifier {
    log: TracingNotifier,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Pending => "pending",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        println!("[{}] {}", tag, notice.message);
        self.log.notify(notice);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn build_storefront(config: &AppConfig) -> Result<Storefront, Box<dyn Error>> {
    let gateway = ReqwestGateway::new(
        GatewayConfig::new(config.api.base_url.clone())
            .with_connect_timeout(config.api.connect_timeout()),
    )?;

    let token_store: Arc<dyn TokenStore> = if config.session.persist_tokens {
        Arc::new(FileTokenStore::new(&config.session.token_file))
    } else {
        Arc::new(InMemoryTokenStore::new())
    };

    let contact = &config.contact;
    let mailer: Arc<dyn ContactMailer> =
        match (&contact.service_id, &contact.template_id, &contact.public_key) {
            (Some(service), Some(template), Some(key)) => Arc::new(EmailJsMailer::new(
                EmailJsConfig::new(service.clone(), template.clone(), key.clone()),
            )),
            _ => Arc::new(UnconfiguredMailer),
        };

    let poller = PollerConfig::default()
        .with_poll_interval(config.polling.interval())
        .with_timeout(config.polling.timeout());

    Ok(Storefront::new(
        StorefrontPorts {
            gateway: Arc::new(gateway),
            token_store,
            notifier: Arc::new(ConsoleNotifier {
                log: TracingNotifier::new(),
            }),
            mailer,
        },
        poller,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    tracing::info!(base_url = %config.api.base_url, "Starting Farmart client");
    let storefront = build_storefront(&config)?;
    storefront.session.bootstrap().await;

    let mut shell = Shell::new(storefront);
    shell.show_route("/");
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if matches!(words[0], "quit" | "exit") {
            break;
        }
        if let Err(e) = shell.run(&words).await {
            println!("error: {}", e.user_message());
        }
    }

    shell.storefront.payments.stop();
    Ok(())
}

/// Command interpreter over one storefront.
struct Shell {
    storefront: Storefront,
    /// Last catalog fetched, used to resolve `add <id>`.
    catalog: Vec<Animal>,
}

impl Shell {
    fn new(storefront: Storefront) -> Self {
        Self {
            storefront,
            catalog: Vec::new(),
        }
    }

    fn show_route(&self, path: &str) {
        match self.storefront.navigate(path) {
            Route::View(view) => println!("view: {:?}", view),
            Route::Redirect(to) => println!("redirect: {}", to),
        }
    }

    async fn run(&mut self, words: &[&str]) -> Result<(), ClientError> {
        let sf = &self.storefront;
        match words {
            ["help"] => println!("{}", HELP),
            ["goto", path] => self.show_route(path),
            ["login", user, pass] => {
                let role = sf.session.login(user, pass).await?;
                println!("logged in as {}", role);
                self.show_route(landing(role));
            }
            ["login", user, pass, portal] => {
                let expected = parse_role(portal)?;
                let role = sf.session.login_for_portal(user, pass, expected).await?;
                println!("logged in as {}", role);
                self.show_route(landing(role));
            }
            ["register", role, username, email, password, phone, location] => {
                let registration = Registration {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    re_password: password.to_string(),
                    phone_number: phone.to_string(),
                    location: location.to_string(),
                    user_type: parse_role(role)?,
                };
                sf.session.register(&registration).await?;
                println!("Registration successful! Please login.");
            }
            ["logout"] => {
                sf.logout();
                println!("logged out");
            }
            ["animals"] => {
                self.catalog = sf.catalog.list_animals().await?;
                for animal in &self.catalog {
                    print_animal(animal, sf.cart.can_add(animal));
                }
            }
            ["add", id] => {
                let id = parse_id::<AnimalId>(id, "animal_id")?;
                if !self.catalog.iter().any(|a| a.id == id) {
                    self.catalog = sf.catalog.list_animals().await?;
                }
                match self.catalog.iter().find(|a| a.id == id) {
                    Some(animal) => {
                        let outcome = sf.cart.add_to_cart(animal);
                        if outcome.changed_cart() {
                            println!("cart: {} item(s), Ksh {}", sf.cart.item_count(), sf.cart.total_price());
                        }
                    }
                    None => println!("no animal #{}", id),
                }
            }
            ["remove", id] => {
                sf.cart.remove_from_cart(parse_id::<AnimalId>(id, "animal_id")?);
                println!("cart: {} item(s)", sf.cart.item_count());
            }
            ["cart"] => {
                for line in sf.cart.lines() {
                    println!(
                        "  #{} {} x{} @ Ksh {} = Ksh {}",
                        line.animal_id,
                        line.name,
                        line.quantity,
                        line.price,
                        line.subtotal()
                    );
                }
                println!("total: {} item(s), Ksh {}", sf.cart.item_count(), sf.cart.total_price());
            }
            ["checkout"] => {
                let order = sf.cart.checkout().await?;
                println!("order #{} placed ({})", order.id, order.status);
                self.show_route("/my-orders");
            }
            ["orders"] => {
                for order in sf.orders.list_orders().await? {
                    println!("  #{} {} Ksh {}", order.id, order.status, order.total_price);
                }
            }
            ["pay", id, phone] => {
                let order = sf.orders.get_order(parse_id::<OrderId>(id, "order_id")?).await?;
                sf.orders.initiate_payment(&order, phone).await?;
                sf.payments.watch(order.id);
                println!("waiting for confirmation of order #{}", order.id);
            }
            ["cancel", id] => {
                let order = sf.orders.get_order(parse_id::<OrderId>(id, "order_id")?).await?;
                sf.orders.cancel_order(&order).await?;
                println!("order #{} cancelled", order.id);
            }
            ["listings"] => {
                for animal in sf.catalog.my_listings().await? {
                    print_animal(&animal, false);
                }
            }
            ["sell", name, kind, breed, age, price, quantity, rest @ ..] if !rest.is_empty() => {
                let (image, description) = split_image(rest);
                let listing = NewListing {
                    name: name.to_string(),
                    animal_type: parse_animal_type(kind),
                    breed: breed.to_string(),
                    age: parse_id::<u32>(age, "age")?,
                    price: parse_id::<Decimal>(price, "price")?,
                    description,
                    quantity: parse_id::<u32>(quantity, "quantity")?,
                    image: match image {
                        Some(path) => Some(read_image(path).await?),
                        None => None,
                    },
                };
                let animal = sf.catalog.create_listing(listing).await?;
                println!("listed #{} {}", animal.id, animal.name);
            }
            ["unlist", id] => {
                sf.catalog.delete_listing(parse_id::<AnimalId>(id, "animal_id")?).await?;
                println!("listing removed");
            }
            ["status", id, decision] => {
                let status = match *decision {
                    "confirm" => OrderStatus::Confirmed,
                    "reject" => OrderStatus::Rejected,
                    _ => return Err(invalid("status", "expected confirm or reject")),
                };
                let order = sf
                    .orders
                    .update_status(parse_id::<OrderId>(id, "order_id")?, status)
                    .await?;
                println!("order #{} is now {}", order.id, order.status);
            }
            ["stats"] => {
                let stats = sf.dashboard.pro_stats().await?;
                println!(
                    "listings {} | orders {} | pending {} | revenue Ksh {}",
                    stats.total_listings, stats.total_orders, stats.pending_orders, stats.total_revenue
                );
                for (key, value) in &stats.extra {
                    println!("  {}: {}", key, value);
                }
            }
            ["contact", portal, name, email, message @ ..] if !message.is_empty() => {
                let portal = match *portal {
                    "seller" => Portal::Seller,
                    _ => Portal::Buyer,
                };
                sf.contact
                    .send(&ContactMessage {
                        name: name.to_string(),
                        email: email.to_string(),
                        message: message.join(" "),
                        portal,
                    })
                    .await?;
                println!("{} ({})", portal.back_label(), portal.back_path());
            }
            _ => println!("unknown command, type `help`"),
        }
        Ok(())
    }
}

fn landing(role: UserType) -> &'static str {
    match role {
        UserType::Buyer => "/shop",
        UserType::Farmer => "/seller/dashboard",
    }
}

fn parse_role(raw: &str) -> Result<UserType, ClientError> {
    match raw.to_ascii_lowercase().as_str() {
        "buyer" => Ok(UserType::Buyer),
        "farmer" | "seller" => Ok(UserType::Farmer),
        _ => Err(invalid("role", "expected buyer or farmer")),
    }
}

fn parse_animal_type(raw: &str) -> AnimalType {
    serde_json::from_value(serde_json::Value::String(raw.to_ascii_uppercase()))
        .unwrap_or(AnimalType::Other)
}

fn parse_id<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, ClientError> {
    raw.parse().map_err(|_| invalid(field, "not a valid value"))
}

fn invalid(field: &str, reason: &str) -> ClientError {
    farmart::domain::foundation::ValidationError::invalid_format(field, reason).into()
}

/// Splits an optional trailing `@path` image argument off the description.
fn split_image<'a>(words: &[&'a str]) -> (Option<&'a str>, String) {
    if let Some((last, rest)) = words.split_last() {
        let last: &'a str = *last;
        if let Some(path) = last.strip_prefix('@') {
            if !rest.is_empty() {
                return (Some(path), rest.join(" "));
            }
        }
    }
    (None, words.join(" "))
}

async fn read_image(path: &str) -> Result<ImageUpload, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| invalid("image", &e.to_string()))?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageUpload::new(file_name, bytes))
}

fn print_animal(animal: &Animal, can_add: bool) {
    let stock = if animal.is_out_of_stock() {
        "out of stock".to_string()
    } else {
        format!("{} available", animal.quantity)
    };
    println!(
        "  #{} {} ({} {}) Ksh {} - {}{}",
        animal.id,
        animal.name,
        animal.breed,
        animal.animal_type,
        animal.price,
        stock,
        if can_add { "" } else { " [cannot add]" }
    );
}
