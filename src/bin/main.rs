// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Parser, Subcommand};
use csv::{ReaderBuilder, Trim, Writer};
use pos_core::{
    Cart, DateRange, FilterCriteria, Order, OrderLine, OrderStatus, PosConfig, SalesSummary,
    filter, money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// POS Core - Cart totals and order filtering from CSV files
///
/// Reads orders or cart lines from a CSV file and writes results to stdout.
#[derive(Parser, Debug)]
#[command(name = "pos-core")]
#[command(about = "Cart totals, order filtering and sales summaries for a point-of-sale", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter an orders CSV and print the matching rows
    ///
    /// Expected format: id,date,status,payment_method,total
    Orders {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Case-insensitive substring of the order id
        #[arg(long, default_value = "")]
        search: String,

        /// Keep only these statuses (repeatable)
        #[arg(long = "status", value_name = "STATUS")]
        statuses: Vec<OrderStatus>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,
    },
    /// Compute subtotal, tax and total of a cart CSV
    ///
    /// Expected format: id,name,quantity,rate
    Cart {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Tax rate as a fraction, overrides POS_TAX_RATE
        #[arg(long, value_name = "RATE")]
        tax_rate: Option<Decimal>,
    },
    /// Print sales, order count and product count of an orders CSV
    Summary {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of products in the catalog
        #[arg(long, default_value_t = 0)]
        products: usize,
    },
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays valid CSV
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "pos_core=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Orders {
            input,
            search,
            statuses,
            from,
            to,
        } => {
            let date_range = DateRange::parse(from.as_deref(), to.as_deref())?;
            let criteria = FilterCriteria {
                search_text: search,
                statuses: statuses.into_iter().collect(),
                date_range,
            };
            let orders = read_orders(open(&input)?)?;
            write_orders(filter(&orders, &criteria), std::io::stdout())?;
        }
        Command::Cart { input, tax_rate } => {
            let config = match tax_rate {
                Some(rate) => PosConfig::new(rate)?,
                None => PosConfig::from_env()?,
            };
            let cart = read_cart(open(&input)?, &config)?;
            write_totals(&cart, std::io::stdout())?;
        }
        Command::Summary { input, products } => {
            let orders = read_orders(open(&input)?)?;
            let summary = SalesSummary::new(&orders, products)?;
            let mut wtr = Writer::from_writer(std::io::stdout());
            wtr.serialize(summary)?;
            wtr.flush()?;
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, String> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| format!("opening file '{}': {}", path.display(), e))
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " Completed "
        .has_headers(true)
        .from_reader(reader)
}

/// Raw order row.
///
/// Fields: `id, date, status, payment_method, total`
#[derive(Debug, Deserialize)]
struct OrderRecord {
    id: String,
    date: String,
    status: String,
    payment_method: String,
    total: String,
}

impl OrderRecord {
    /// Converts the row into an [`Order`].
    ///
    /// Returns `None` for an unknown status or an unparsable total. The date
    /// is kept verbatim; a bad date only excludes the order from date filters.
    fn into_order(self) -> Option<Order> {
        let status = self.status.parse::<OrderStatus>().ok()?;
        let total = self
            .total
            .trim_start_matches('$')
            .parse::<Decimal>()
            .ok()?;
        Some(Order::from_parts(
            &self.id,
            &self.date,
            status,
            &self.payment_method,
            total,
        ))
    }
}

/// Reads orders, skipping rows that cannot be converted.
///
/// # CSV Format
///
/// ```csv
/// id,date,status,payment_method,total
/// 1001,2023-05-01,Completed,Credit Card,$199.99
/// 1002,2023-05-02,Processing,PayPal,149.50
/// ```
///
/// # Errors
///
/// Returns a CSV error if the header cannot be read.
pub fn read_orders<R: Read>(reader_in: R) -> Result<Vec<Order>, csv::Error> {
    let mut rdr = reader(reader_in);
    rdr.headers()?;

    let mut orders = Vec::new();
    for result in rdr.deserialize::<OrderRecord>() {
        match result {
            Ok(record) => {
                let id = record.id.clone();
                match record.into_order() {
                    Some(order) => orders.push(order),
                    None => warn!(order = %id, "skipping order with invalid status or total"),
                }
            }
            Err(e) => warn!(error = %e, "skipping malformed order row"),
        }
    }
    Ok(orders)
}

/// Writes orders in the input format with plain decimal totals.
pub fn write_orders<'a, I, W>(orders: I, writer: W) -> Result<(), csv::Error>
where
    I: IntoIterator<Item = &'a Order>,
    W: Write,
{
    let mut wtr = Writer::from_writer(writer);
    for order in orders {
        wtr.serialize(order)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Raw cart row.
///
/// Fields: `id, name, quantity, rate`
#[derive(Debug, Deserialize)]
struct LineRecord {
    id: String,
    name: String,
    quantity: i64,
    rate: Decimal,
}

/// Builds a cart from line rows, merging repeated ids.
///
/// Rows that fail to parse, carry a negative quantity or rate, or would push
/// the totals past the `Decimal` range are skipped.
pub fn read_cart<R: Read>(reader_in: R, config: &PosConfig) -> Result<Cart, csv::Error> {
    let mut rdr = reader(reader_in);
    rdr.headers()?;

    let mut cart = Cart::new(config);
    for result in rdr.deserialize::<LineRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "skipping malformed cart row");
                continue;
            }
        };
        let line = OrderLine::new(
            record.id.as_str(),
            record.name,
            record.quantity,
            record.rate,
        );
        if let Err(e) = line.and_then(|line| cart.add_line(line).map(|_| ())) {
            warn!(line = %record.id, error = %e, "skipping cart row");
        }
    }
    Ok(cart)
}

#[derive(Debug, Serialize)]
struct TotalsRecord {
    subtotal: String,
    tax: String,
    total: String,
}

/// Writes `subtotal,tax,total` with two decimal places.
pub fn write_totals<W: Write>(cart: &Cart, writer: W) -> Result<(), csv::Error> {
    let totals = cart.totals();
    let mut wtr = Writer::from_writer(writer);
    wtr.serialize(TotalsRecord {
        subtotal: money::format_amount(totals.subtotal),
        tax: money::format_amount(totals.tax),
        total: money::format_amount(totals.total),
    })?;
    wtr.flush()?;
    Ok(())
}
