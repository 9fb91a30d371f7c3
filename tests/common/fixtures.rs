//! Static CSV feeds used across harnesses.
//!
//! Each feed is a `&'static str` shaped like a real export: the local
//! `products.csv` layout, a published-sheet export with capitalised headers
//! and CRLF line endings, and a deliberately messy feed.

/// The canonical local feed: every recognised column, one inactive row.
pub const FEED_BASIC: &str = "\
id,name,category,price,description,image,status,stock
1,Oak Desk,furniture,250,Solid oak writing desk,desk.jpg,active,4
2,Brass Lamp,lighting,40,Adjustable arm,lamp.jpg,active,0
3,Walnut Chair,furniture,90.75,Dining chair,chair.jpg,discontinued,12
4,\"Widget, Large\",parts,25,\"Comes with \"\"pro\"\" mount\",,active,100
";

/// Published-sheet export: capitalised headers, an extra `Featured` column,
/// CRLF endings, and a trailing blank line.
pub const FEED_SHEET: &str = "ID,Name,Category,Price,Image,Stock,Featured\r\n\
10,Pine Shelf,storage,35,shelf.png,7,yes\r\n\
11,Cedar Box,storage,12,,0,\r\n\
\r\n";

/// Rows with missing, empty, and non-numeric values, plus blank lines.
pub const FEED_MESSY: &str = "\
id , NAME, price ,stock,status

abc,,twelve,3 boxes,
,Loose Screw
   
7,Nail,$4,,inactive
";

/// Header only: no data rows.
pub const FEED_HEADER_ONLY: &str = "id,name,category,price\n";

/// Generate a feed with `n` rows whose ids and prices are derived from the
/// row index. Every third row is inactive.
pub fn feed_generated(n: usize) -> String {
    let mut out = String::from("id,name,category,price,status,stock\n");
    for i in 1..=n {
        let status = if i % 3 == 0 { "draft" } else { "active" };
        out.push_str(&format!(
            "{i},Item {i},cat-{},{},{status},{}\n",
            i % 5,
            i * 3,
            i % 7
        ));
    }
    out
}

/// Write `text` to `products.csv` inside `dir` and return its path.
pub fn write_feed(dir: &std::path::Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("products.csv");
    std::fs::write(&path, text).expect("write feed fixture");
    path
}
