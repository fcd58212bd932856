//! SalesDesk CLI
//!
//! Command-line interface to a running SalesDesk gateway:
//! - Create orders
//! - Generate sales reports
//! - Work the fulfillment queue
//! - Inspect widget configuration and health

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use salesdesk::intercept::{FetchSlot, HttpTransport, InboundResponse, OutboundRequest};
use salesdesk::upstream::{
    CreateOrder, Envelope, InvoiceRequest, PendingOrder, ReportRequest, SalesApiClient,
    SalesApiConfig,
};

#[derive(Parser)]
#[command(name = "salesdesk-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Talk to a running SalesDesk gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gateway URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an order
    Order {
        /// Customer name
        #[arg(short, long)]
        customer: String,
        /// Product name
        #[arg(short, long)]
        product: String,
        /// Quantity (positive integer)
        #[arg(short, long)]
        quantity: i64,
        /// Tentative delivery date (YYYY-MM-DD)
        #[arg(short, long)]
        delivery: Option<String>,
        /// Contact number
        #[arg(long)]
        contact: Option<String>,
    },

    /// Generate a sales report (all time when no range is given)
    Report {
        /// Start date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
        /// Quick range
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        last: Option<QuickRange>,
    },

    /// List orders awaiting an invoice
    Pending,

    /// Generate an invoice for a pending order
    Invoice {
        /// Sales order ID
        sales_id: i64,
        /// Invoice amount
        amount: f64,
    },

    /// Show the chat widget configuration for a dashboard route
    WidgetConfig {
        #[arg(short, long, default_value = "/")]
        route: String,
    },

    /// Show gateway health
    Health,
}

/// Same ranges as the dashboard's quick filters
#[derive(Clone, Copy, ValueEnum)]
pub enum QuickRange {
    Today,
    Week,
    Month,
}

impl QuickRange {
    fn days(self) -> i64 {
        match self {
            QuickRange::Today => 0,
            QuickRange::Week => 7,
            QuickRange::Month => 30,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let transport = HttpTransport::new(Duration::from_secs(cli.timeout))?;
    let slot = Arc::new(FetchSlot::new(transport));
    let client = SalesApiClient::new(Arc::clone(&slot), SalesApiConfig::single(&cli.api_url));
    let json_output = cli.format == "json";

    match cli.command {
        Commands::Order {
            customer,
            product,
            quantity,
            delivery,
            contact,
        } => {
            let order = CreateOrder {
                customer,
                product,
                quantity,
                tentative_delivery_date: delivery,
                contact_number: contact,
            }
            .validate()?;

            let response = client.create_order(&order).await?;
            let data = envelope_data(&response)?;

            if json_output {
                print_json(&data)?;
            } else {
                println!(
                    "Order created: {} x {} for {}",
                    order.quantity, order.product, order.customer
                );
                if let Some(id) = data.get("id") {
                    println!("  ID: {}", id);
                }
            }
        }

        Commands::Report { from, to, last } => {
            let request = match (from, to, last) {
                (Some(from), Some(to), _) => ReportRequest::for_range(from, to),
                (_, _, Some(range)) => ReportRequest::last_days(range.days(), Local::now().date_naive()),
                _ => ReportRequest::all_time(),
            };

            let response = client.generate_report(&request).await?;
            let report = report_body(&response)?;

            if json_output {
                print_json(&report)?;
            } else {
                println!("{}", report["dateRange"].as_str().unwrap_or(request.query.as_str()));
                println!();
                print_report(&report);
            }
        }

        Commands::Pending => {
            let response = client.pending_fulfillment().await?;
            let data = envelope_data(&response)?;

            if json_output {
                print_json(&data)?;
            } else {
                let orders: Vec<PendingOrder> =
                    serde_json::from_value(data).context("Unexpected pending order format")?;
                print_pending(&orders);
            }
        }

        Commands::Invoice { sales_id, amount } => {
            let invoice = InvoiceRequest { sales_id, amount }.validate()?;
            let response = client.process_invoice(&invoice).await?;
            let data = envelope_data(&response)?;

            if json_output {
                print_json(&data)?;
            } else {
                println!("Invoice generated for order #{} ({:.2})", sales_id, amount);
            }
        }

        Commands::WidgetConfig { route } => {
            let url = format!(
                "{}/api/widget/config?route={}",
                cli.api_url.trim_end_matches('/'),
                urlencoding::encode(&route)
            );
            let response = slot.fetch(OutboundRequest::get(url)).await?;
            let body = checked_json(&response)?;

            if json_output {
                print_json(&body)?;
            } else {
                let options = &body["config"]["chatOptions"];
                println!("Route:        {}", route);
                println!("Agent:        {}", options["agentId"].as_str().unwrap_or("-"));
                println!("Environment:  {}", options["agentEnvironmentId"].as_str().unwrap_or("-"));
                println!("Loader:       {}", body["loader_url"].as_str().unwrap_or("-"));
                println!("Delay:        {} ms", body["injection_delay_ms"]);
            }
        }

        Commands::Health => {
            let url = format!("{}/health", cli.api_url.trim_end_matches('/'));
            let response = slot.fetch(OutboundRequest::get(url)).await.with_context(|| {
                format!(
                    "Cannot connect to the SalesDesk gateway at {}. Is it running? (cargo run --bin salesdesk)",
                    cli.api_url
                )
            })?;
            let health = checked_json(&response)?;

            if json_output {
                print_json(&health)?;
            } else {
                println!("SalesDesk v{}", health["version"].as_str().unwrap_or("?"));
                println!();
                println!("Status:       {}", health["status"].as_str().unwrap_or("unknown"));
                println!("Interceptor:  {}", health["interceptor"].as_str().unwrap_or("unknown"));
                println!("Sales API:    {}", health["upstream"].as_str().unwrap_or("-"));
                println!("Dashboards:   {}", health["connections"]);
                if let Some(uptime) = health["uptime_seconds"].as_u64() {
                    println!("Uptime:       {}", format_duration(uptime));
                }
            }
        }
    }

    Ok(())
}

/// Unwrap `{success, data|error}`, failing on transport or application errors
fn envelope_data(response: &InboundResponse) -> Result<Value> {
    let envelope: Envelope<Value> = match response.decode() {
        Ok(envelope) => envelope,
        Err(_) => bail!("Gateway returned {}: {}", response.status, response.text()),
    };

    match envelope.into_result() {
        Ok(data) => Ok(data.unwrap_or(Value::Null)),
        Err(message) => bail!("{}", message),
    }
}

/// Reports carry `summary` and `data` beside `success`, so keep the whole body
fn report_body(response: &InboundResponse) -> Result<Value> {
    let body = checked_json(response)?;
    if body["success"] == Value::Bool(false) {
        bail!("{}", body["error"].as_str().unwrap_or("Report generation failed"));
    }
    Ok(body)
}

fn checked_json(response: &InboundResponse) -> Result<Value> {
    if !response.is_success() {
        bail!("Gateway returned {}: {}", response.status, response.text());
    }
    response.decode().context("Gateway returned invalid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(report: &Value) {
    let summary = &report["summary"];
    let total_orders = summary["totalOrders"].as_u64().unwrap_or(0);

    if total_orders == 0 {
        println!("No sales data for this period.");
        return;
    }

    println!("Total orders:    {}", total_orders);
    println!("Total quantity:  {}", summary["totalQuantity"].as_u64().unwrap_or(0));
    println!("Delivery rate:   {:.1}%", summary["deliveryRate"].as_f64().unwrap_or(0.0));
    println!("Top product:     {}", summary["topProduct"].as_str().unwrap_or("-"));

    if let Some(customers) = report["data"]["topCustomers"].as_array() {
        println!();
        println!("{:<30} {:>10}", "Customer", "Quantity");
        println!("{}", "-".repeat(41));
        for customer in customers.iter().take(10) {
            println!(
                "{:<30} {:>10}",
                customer["name"].as_str().unwrap_or("-"),
                customer["quantity"].as_u64().unwrap_or(0)
            );
        }
    }
}

fn print_pending(orders: &[PendingOrder]) {
    if orders.is_empty() {
        println!("All caught up! No orders are waiting for an invoice.");
        return;
    }

    println!(
        "{:<6} {:<24} {:<20} {:>8} {:<12}",
        "ID", "Customer", "Product", "Qty", "Requested"
    );
    println!("{}", "-".repeat(74));

    for order in orders {
        println!(
            "{:<6} {:<24} {:<20} {:>8} {:<12}",
            order.id,
            order.customer,
            order.product,
            order.quantity,
            order.requested_date.as_deref().unwrap_or("-")
        );
    }
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quick_range_days() {
        assert_eq!(QuickRange::Today.days(), 0);
        assert_eq!(QuickRange::Week.days(), 7);
        assert_eq!(QuickRange::Month.days(), 30);
    }

    #[test]
    fn test_envelope_data() {
        let ok = InboundResponse::json(200, &json!({"success": true, "data": {"id": 1}}));
        assert_eq!(envelope_data(&ok).unwrap(), json!({"id": 1}));

        let failed = InboundResponse::json(200, &json!({"success": false, "error": "Out of stock"}));
        assert_eq!(envelope_data(&failed).unwrap_err().to_string(), "Out of stock");
    }

    #[test]
    fn test_report_body_keeps_summary() {
        let ok = InboundResponse::json(
            200,
            &json!({"success": true, "summary": {"totalOrders": 2}, "data": {"topCustomers": []}}),
        );
        assert_eq!(report_body(&ok).unwrap()["summary"]["totalOrders"], 2);

        let failed = InboundResponse::json(200, &json!({"success": false, "error": "No sales"}));
        assert_eq!(report_body(&failed).unwrap_err().to_string(), "No sales");

        let unavailable = InboundResponse::json(503, &json!({"error": "down"}));
        assert!(report_body(&unavailable).is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59), "0m 59s");
        assert_eq!(format_duration(3700), "1h 1m");
        assert_eq!(format_duration(90061), "1d 1h 1m");
    }
}
