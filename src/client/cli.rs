use std::io::{self, BufRead, Write};
use std::time::Duration;
use clap::{Args, Parser, Subcommand};
use tokio::select;
use crate::client::api::ApiClient;
use crate::client::cart::SwitchOutcome;
use crate::client::controller::analytics;
use crate::client::controller::board::{BoardSnapshot, Bucket, OrderCard};
use crate::client::controller::error::ClientError;
use crate::client::controller::merchant::MerchantConsole;
use crate::client::controller::segmentation::SegmentationTrigger;
use crate::client::controller::storefront::{Confirm, Storefront, StorefrontView};
use crate::client::model::config::ClientConfig;
use crate::client::model::dish::DishView;
use crate::client::model::order::OrderStatus;
use crate::client::model::restaurant::Restaurant;
use crate::client::model::rule::DiscountRule;
use crate::client::model::{DishId, OrderId, PriceLevel};
use crate::client::scheduler::behavior::BehaviorLogger;
use crate::client::state::Session;

#[derive(Parser, Debug)]
#[command(name = "canteen")]
#[command(about = "client cli used by customers and merchants of the canteen ordering platform", version, long_about = None
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// account registration
    #[command(arg_required_else_help = true)]
    Register(RegisterArgs),
    /// list all restaurants
    Restaurants,
    /// interactive ordering shell for customers
    Shop(LoginArgs),
    /// restaurant management
    #[command(arg_required_else_help = true)]
    Merchant(MerchantArgs),
}

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    #[arg(short, long, env = "CANTEEN_USERNAME")]
    username: String,
    #[arg(short, long, env = "CANTEEN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    #[command(subcommand)]
    command: RegisterCmds,
}

#[derive(Debug, Subcommand)]
enum RegisterCmds {
    /// customer account
    User {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long, help = "Campus area the customer usually orders from.")]
        area: Option<String>,
    },
    /// merchant account together with its restaurant
    Restaurant {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long, help = "Display name of the restaurant.")]
        name: String,
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct MerchantArgs {
    #[command(flatten)]
    login: LoginArgs,
    #[command(subcommand)]
    command: MerchantCmds,
}

#[derive(Debug, Subcommand)]
enum MerchantCmds {
    /// show discount rules for every price level
    Rules,
    /// replace the discount rules
    #[command(arg_required_else_help = true)]
    SetRules {
        #[arg(help = "Rules such as 1=0.95 2=0.9.", value_name = "LEVEL=DISCOUNT", num_args = 1.., value_parser = parse_rule_input)]
        rules: Vec<(PriceLevel, String)>,
    },
    /// live order board, refreshed until Ctrl-C
    Orders {
        #[arg(long, help = "Print the board once and exit.")]
        once: bool,
    },
    /// accept a pending order
    #[command(arg_required_else_help = true)]
    Confirm {
        #[arg(value_name = "ORDER_ID")]
        id: OrderId,
    },
    /// mark a confirmed order as done
    #[command(arg_required_else_help = true)]
    Complete {
        #[arg(value_name = "ORDER_ID")]
        id: OrderId,
    },
    /// reassign customer price levels
    Segment,
    /// sales statistics
    Stats,
}

/// The discount itself is validated later, together with the other levels.
fn parse_rule_input(s: &str) -> Result<(PriceLevel, String), String> {
    let (level, discount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LEVEL=DISCOUNT, got `{s}`"))?;
    let level = level
        .trim()
        .parse()
        .map_err(|_| format!("invalid price level `{level}`"))?;
    Ok((level, discount.to_string()))
}

pub(crate) async fn dispatch(config: ClientConfig, command: Commands) -> Result<(), anyhow::Error> {
    let mut session = Session::new(ApiClient::new(&config)?);
    match command {
        Commands::Register(args) => register(&session, args.command).await,
        Commands::Restaurants => {
            print_restaurants(&session.api().list_restaurants().await?);
            Ok(())
        }
        Commands::Shop(login) => {
            let user = session.login_user(&login.username, &login.password).await?;
            println!("welcome, {}", user.username);
            let result = shop(&session, &config).await;
            session.logout();
            result
        }
        Commands::Merchant(args) => {
            session.login_merchant(&args.login.username, &args.login.password).await?;
            let result = merchant(&session, &config, args.command).await;
            session.logout();
            result
        }
    }
}

async fn register(session: &Session, command: RegisterCmds) -> Result<(), anyhow::Error> {
    match command {
        RegisterCmds::User { login, area } => {
            session
                .register_user(&login.username, &login.password, area.as_deref())
                .await?;
            println!("user {} registered, you can now log in", login.username);
        }
        RegisterCmds::Restaurant { login, name, location } => {
            session
                .register_merchant(&login.username, &login.password, &name, location.as_deref())
                .await?;
            println!("restaurant {} registered for {}", name, login.username);
        }
    }
    Ok(())
}

const SHOP_HELP: &str = "\
commands:
  restaurants        list restaurants
  open <id>          open a restaurant's menu
  menu               show the open menu
  add <dish_id>...   add dishes to the cart
  cart               show the cart
  order              place the order
  segment            recompute customer price levels
  help               show this message
  quit               leave the shop";

async fn shop(session: &Session, config: &ClientConfig) -> Result<(), anyhow::Error> {
    let (behavior, drain) = BehaviorLogger::spawn(session.api(), config.behavior_queue_capacity);
    let mut store = Storefront::new(session, behavior)?;
    let segmentation = SegmentationTrigger::new(session.api());
    println!("{}", SHOP_HELP);

    while let Some(line) = read_line("> ")? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let result = match command {
            "restaurants" => store.restaurants().await.map(|list| print_restaurants(&list)),
            "open" => match parse_id(words.next()) {
                Ok(id) => store
                    .open_restaurant(id, &StdinConfirm)
                    .await
                    .map(|outcome| match outcome {
                        SwitchOutcome::Declined => println!("kept the current cart"),
                        _ => print_menu(store.menu()),
                    }),
                Err(e) => Err(e),
            },
            "menu" => {
                print_menu(store.menu());
                Ok(())
            }
            "add" => add_dishes(&mut store, words).map(|()| print_cart(&store.view())),
            "cart" => {
                print_cart(&store.view());
                Ok(())
            }
            "order" => store.place_order().await.map(|receipt| println!("{}", receipt)),
            "segment" => match segmentation.trigger().await {
                Ok(message) => {
                    println!("{}", message);
                    store.reload_menu().await.map(|()| print_menu(store.menu()))
                }
                Err(e) => Err(e),
            },
            "help" => {
                println!("{}", SHOP_HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            other => Err(ClientError::validation(format!("unknown command `{}`, try `help`", other))),
        };
        match result {
            Err(e) if e.is_server() => println!("rejected by the server: {}", e),
            Err(e) => println!("error: {}", e),
            Ok(()) => {}
        }
    }

    drain.shutdown().await;
    Ok(())
}

fn add_dishes<'a>(store: &mut Storefront, ids: impl Iterator<Item = &'a str>) -> Result<(), ClientError> {
    let ids = ids
        .map(|id| parse_id(Some(id)))
        .collect::<Result<Vec<DishId>, _>>()?;
    if ids.is_empty() {
        return Err(ClientError::validation("usage: add <dish_id>..."));
    }
    store.add_dishes(&ids)
}

fn parse_id(word: Option<&str>) -> Result<i64, ClientError> {
    let word = word.ok_or_else(|| ClientError::validation("an id is required"))?;
    word.parse()
        .map_err(|_| ClientError::validation(format!("`{}` is not a valid id", word)))
}

/// Blocks the worker thread on stdin; `None` at end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    tokio::task::block_in_place(|| {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim().to_string())),
        }
    })
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match read_line(&format!("{} [y/N] ", prompt)) {
            Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

async fn merchant(session: &Session, config: &ClientConfig, command: MerchantCmds) -> Result<(), anyhow::Error> {
    let console = MerchantConsole::new(session)?;
    match command {
        MerchantCmds::Rules => print_rules(&console.load_rules().await?),
        MerchantCmds::SetRules { rules } => {
            let inputs: Vec<(PriceLevel, &str)> = rules
                .iter()
                .map(|(level, discount)| (*level, discount.as_str()))
                .collect();
            println!("{}", console.save_rules(&inputs).await?);
        }
        MerchantCmds::Orders { once: true } => {
            console.board().refresh().await;
            print_board(&console.board().snapshot());
        }
        MerchantCmds::Orders { once: false } => live_board(&console, config.poll_interval).await?,
        MerchantCmds::Confirm { id } => {
            console.board().confirm(id).await?;
            println!("order {} confirmed", id);
        }
        MerchantCmds::Complete { id } => {
            console.board().complete(id).await?;
            println!("order {} completed", id);
        }
        MerchantCmds::Segment => {
            let outcome = console.run_segmentation().await?;
            println!("{}", outcome.message);
            match outcome.dashboard {
                Ok(dashboard) => {
                    print_rules(&dashboard.rules);
                    print!("{}", analytics::render(&dashboard.stats));
                }
                Err(e) => println!("failed to reload rules and stats: {}", e),
            }
        }
        MerchantCmds::Stats => print!("{}", analytics::render(&console.stats().await?)),
    }
    Ok(())
}

async fn live_board(console: &MerchantConsole, period: Duration) -> Result<(), anyhow::Error> {
    println!("orders of {} #{} (Ctrl-C to stop)", console.name(), console.restaurant_id());
    let mut rx = console.board().subscribe();
    let poller = console.start_polling(period);
    loop {
        select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_board(&rx.borrow_and_update());
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }
    poller.stop().await;
    Ok(())
}

const NO_IMAGE: &str = "no image";

fn print_restaurants(restaurants: &[Restaurant]) {
    if restaurants.is_empty() {
        println!("no restaurants yet");
    }
    for restaurant in restaurants {
        println!("{}", restaurant_line(restaurant));
    }
}

fn restaurant_line(restaurant: &Restaurant) -> String {
    format!(
        "  [{}] {} - {}  <{}>",
        restaurant.id,
        restaurant.name,
        restaurant.location.as_deref().unwrap_or("location unknown"),
        restaurant.image_url.as_deref().unwrap_or(NO_IMAGE)
    )
}

fn print_menu(menu: &[DishView]) {
    if menu.is_empty() {
        println!("no menu open, use `open <id>`");
    }
    for dish in menu {
        println!("{}", dish_line(dish));
    }
}

fn dish_line(dish: &DishView) -> String {
    let image = dish.image_ref.as_deref().unwrap_or(NO_IMAGE);
    match &dish.discount_label {
        Some(label) => format!(
            "  [{}] {}  {} (was {}, {})  <{}>",
            dish.id, dish.name, dish.final_price, dish.base_price, label, image
        ),
        None => format!("  [{}] {}  {}  <{}>", dish.id, dish.name, dish.final_price, image),
    }
}

fn print_cart(view: &StorefrontView) {
    if let Some(receipt) = &view.receipt {
        println!("{}", receipt);
        return;
    }
    if view.cart.lines.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in &view.cart.lines {
        if line.final_price == line.base_price {
            println!("  {}  {}", line.name, line.final_price);
        } else {
            println!("  {}  {} (was {})", line.name, line.final_price, line.base_price);
        }
    }
    println!("total {} (final amount is set when the order is placed)", view.displayed_total());
}

fn print_rules(rules: &[DiscountRule]) {
    for rule in rules {
        println!("  level {}: {}", rule.price_level, rule.discount);
    }
}

fn print_board(snapshot: &BoardSnapshot) {
    for status in OrderStatus::BOARD {
        println!("== {} ==", status);
        match snapshot.bucket(status) {
            Some(Bucket::Loading) | None => println!("  loading..."),
            Some(Bucket::Failed(message)) => println!("  failed to load: {}", message),
            Some(Bucket::Loaded(orders)) if orders.is_empty() => println!("  no orders"),
            Some(Bucket::Loaded(orders)) => {
                for order in orders {
                    println!("  {}", OrderCard(order));
                }
            }
        }
    }
}
