//! Minimal HTML for the view snapshots. Every interpolated value goes
//! through [`escape`].

use crate::views::{BuyerPage, DetailPage, ListPage, SellerPage};
use std::fmt::Write;

pub const LOADING: &str = "Loading...";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` with the title and any pending notices.
pub fn document(title: &str, notices: &[String], flash: Option<&str>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\n\
         <nav><a href=\"/\">Auctions</a></nav>\n",
        escape(title)
    );
    for notice in notices {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(notice));
    }
    if let Some(flash) = flash {
        let _ = writeln!(html, "<p class=\"info\">{}</p>", escape(flash));
    }
    html.push_str(body);
    html.push_str("</body></html>\n");
    html
}

pub fn loading(notices: &[String]) -> String {
    document(LOADING, notices, None, &format!("<p>{LOADING}</p>\n"))
}

pub fn message(title: &str, notices: &[String], text: &str) -> String {
    document(title, notices, None, &format!("<p>{}</p>\n", escape(text)))
}

pub fn list(page: &ListPage) -> String {
    let mut html = String::from("<h1>Auctions</h1>\n");
    if page.auctions.is_empty() {
        html.push_str("<p>No auctions yet.</p>\n");
        return html;
    }
    html.push_str("<ul class=\"auctions\">\n");
    for card in &page.auctions {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a> <span>{}</span> <span>Ends {}</span> \
             <a href=\"{}\">{}</a></li>",
            escape(&card.detail_path),
            escape(&card.name),
            escape(&card.description),
            escape(&card.ends_on),
            escape(&card.seller_path),
            escape(&card.seller),
        );
    }
    html.push_str("</ul>\n");
    html
}

pub fn detail(page: &DetailPage) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<h1>{}</h1>\n<p>{}</p>\n<p>Ends {}</p>\n<p>Seller <a href=\"{}\">{}</a></p>",
        escape(&page.name),
        escape(&page.description),
        escape(&page.ends_on),
        escape(&page.seller_path),
        escape(&page.seller),
    );

    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/auction/{id}/offer\">\
         <input name=\"amount\" value=\"{amount}\"> <button>Offer</button></form>\n\
         <p class=\"hint\">{hint}</p>",
        id = escape(&page.id),
        amount = escape(&page.staged_amount),
        hint = escape(&page.minimum_offer_hint),
    );
    if let Some(err) = &page.input_error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape(err));
    }
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/auction/{}/trade\"><button>Trade</button></form>",
        escape(&page.id),
    );

    html.push_str("<h2>Offers</h2>\n");
    match &page.offers {
        None => {
            let _ = writeln!(html, "<p>{LOADING}</p>");
        }
        Some(offers) if offers.is_empty() => html.push_str("<p>No offers yet.</p>\n"),
        Some(offers) => {
            html.push_str("<ul class=\"offers\">\n");
            for row in offers {
                let _ = writeln!(
                    html,
                    "<li><a href=\"{}\">{}</a> {}</li>",
                    escape(&row.buyer_path),
                    escape(&row.buyer),
                    escape(&row.amount),
                );
            }
            html.push_str("</ul>\n");
        }
    }
    html
}

pub fn buyer(page: &BuyerPage) -> String {
    let mut html = format!("<h1>Offers by {}</h1>\n", escape(&page.buyer));
    if page.offers.is_empty() {
        html.push_str("<p>No offers.</p>\n");
        return html;
    }
    html.push_str("<table><tr><th>Offer</th><th>Auction</th><th>Buyer</th><th>Price</th></tr>\n");
    for row in &page.offers {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
            escape(&row.offer_id),
            escape(&row.auction_path),
            escape(&row.auction_id),
            escape(&row.buyer),
            escape(&row.offer_price),
        );
    }
    html.push_str("</table>\n");
    html
}

pub fn seller(page: &SellerPage) -> String {
    let mut html = format!("<h1>Auctions by {}</h1>\n", escape(&page.seller));
    if page.auctions.is_empty() {
        html.push_str("<p>No auctions.</p>\n");
        return html;
    }
    html.push_str(
        "<table><tr><th>Id</th><th>Seller</th><th>Name</th><th>Description</th>\
         <th>Ends</th><th>Status</th><th></th></tr>\n",
    );
    for row in &page.auctions {
        let action = if row.status == "Active" {
            format!(
                "<form method=\"post\" action=\"/seller/{}/{}/cancel\"><button>Cancel</button></form>",
                escape(&row.seller),
                escape(&row.id),
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            html,
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            if row.selected { " class=\"selected\"" } else { "" },
            escape(&row.id),
            escape(&row.seller),
            escape(&row.name),
            escape(&row.description),
            escape(&row.ends_on),
            row.status,
            action,
        );
    }
    html.push_str("</table>\n");
    html
}
