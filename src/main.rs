use clap::Parser;
use pos_console::adapters::http::reports::ReportPeriod;
use pos_console::config::{CliConfig, Command, PeriodArg, TomlConfig};
use pos_console::core::CategoryFilter;
use pos_console::domain::model::ReportQuery;
use pos_console::domain::ports::ConfigProvider;
use pos_console::utils::error::ErrorSeverity;
use pos_console::utils::{logger, validation::Validate};
use pos_console::{ApiClient, PosError, PosSession, Result};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let (config, file_error) = match cli.config.clone() {
        Some(path) => match TomlConfig::from_file(&path) {
            Ok(file) => (cli.merged_with(&file), None),
            Err(e) => (cli, Some(e)),
        },
        None => (cli, None),
    };

    if config.json_logs {
        logger::init_json_logger(config.log_level.as_deref());
    } else {
        logger::init_cli_logger(config.verbose, config.log_level.as_deref());
    }

    tracing::info!("Starting pos-console");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Some(e) = file_error {
        tracing::error!("❌ Could not load config file: {}", e);
        exit_with(&e);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        exit_with(&e);
    }

    let result = match ApiClient::from_config(&config) {
        Ok(client) => run(&config, client).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        exit_with(&e);
    }
}

fn exit_with(e: &PosError) {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(config: &CliConfig, client: ApiClient) -> Result<()> {
    let branch = config.branch_id().map(str::to_string);

    match &config.command {
        Command::Branches => return print_json(&client.branches().await?),
        Command::Users => return print_json(&client.users().await?),
        Command::Roles => return print_json(&client.roles().await?),
        Command::Profile { user } => {
            let profile = match user {
                Some(user_id) => client.profile_for_user(user_id).await?,
                None => client.my_profile().await?,
            };
            return print_json(&profile);
        }
        Command::Stock => return print_json(&client.stocks(branch.as_deref()).await?),
        Command::Report {
            start,
            end,
            payment_method,
            period,
        } => {
            let report = match period {
                Some(period) => {
                    let period = match period {
                        PeriodArg::Weekly => ReportPeriod::Weekly,
                        PeriodArg::Monthly => ReportPeriod::Monthly,
                        PeriodArg::Yearly => ReportPeriod::Yearly,
                    };
                    client.sales_by_period(period, branch.as_deref()).await?
                }
                None => {
                    let query = ReportQuery {
                        start_date: start.clone(),
                        end_date: end.clone(),
                        branch_id: branch.clone(),
                        payment_method: payment_method.clone(),
                    };
                    client.sales_report(&query).await?
                }
            };
            return print_json(&report);
        }
        _ => {}
    }

    let mut session = PosSession::from_config(client, config);

    match &config.command {
        Command::Products { category, search } => {
            session.refresh_catalog().await?;
            let filter = CategoryFilter::parse(category.as_deref());
            let catalog = session.catalog();
            for product in catalog.filter(&filter, search.as_deref().unwrap_or("")) {
                println!(
                    "{:<24} {:<32} {:>10} {:>3} variants",
                    product.id,
                    product.name_product,
                    product.price.to_string(),
                    catalog.variants_of(&product.id).len()
                );
            }
        }
        Command::Customers => {
            session.refresh_customers().await?;
            for customer in session.customers() {
                println!("{:<24} {:<24} {}", customer.id, customer.name, customer.email);
            }
        }
        Command::Orders => {
            session.refresh_catalog().await?;
            session.refresh_orders().await?;
            print_current_order(&session);
        }
        Command::Add { product, variant } => {
            session.refresh_catalog().await?;
            session.refresh_orders().await?;
            let order_id = session.add_to_cart(product, variant.as_deref()).await?;
            tracing::info!("✅ Added {} to order {}", product, order_id.unwrap_or_default());
            print_current_order(&session);
        }
        Command::Qty { item, quantity } => {
            session.refresh_catalog().await?;
            session.refresh_orders().await?;
            session.update_quantity(item, *quantity).await?;
            print_current_order(&session);
        }
        Command::Remove { item } => {
            session.refresh_catalog().await?;
            session.refresh_orders().await?;
            session.remove_item(item).await?;
            print_current_order(&session);
        }
        Command::Checkout { customer, method } => {
            session.refresh_catalog().await?;
            session.refresh_orders().await?;
            session.refresh_customers().await?;
            session.assign_customer(customer)?;

            let order_id = session.process_payment().await?;
            let payment = session.create_payment(*method).await?;
            tracing::info!("Payment {} created for order {}", payment.id, order_id);
            let receipt = session.verify_payment().await?;

            tracing::info!("✅ Order {} paid", receipt.order_id);
            println!("Order     {}", receipt.order_id);
            println!("Payment   {} ({})", receipt.payment_id, receipt.method);
            println!("Subtotal  {}", receipt.totals.subtotal);
            println!("Tax       {}", receipt.totals.tax);
            println!("Discount  {}", receipt.totals.discount);
            println!("Total     {}", receipt.totals.total);
        }
        Command::Branches
        | Command::Users
        | Command::Roles
        | Command::Profile { .. }
        | Command::Stock
        | Command::Report { .. } => {}
    }

    Ok(())
}

fn print_current_order(session: &PosSession<ApiClient>) {
    let Some(order) = session.current_order() else {
        println!("No pending order");
        return;
    };

    println!("Order {} ({} pending)", order.id, session.pending_orders().len());
    for (shown, item) in session.current_lines() {
        println!(
            "  {:<24} {:<32} x{:<3} {:>10}",
            item.id,
            shown.name,
            item.qty,
            item.subtotal.unwrap_or(item.price * item.qty).to_string()
        );
    }
    if let Some(totals) = session.current_totals() {
        println!("  Subtotal {}", totals.subtotal);
        println!("  Tax      {}", totals.tax);
        println!("  Discount {}", totals.discount);
        println!("  Total    {}", totals.total);
    }
}
