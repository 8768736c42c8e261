pub mod browser;
pub mod page;
pub mod web;

pub use browser::Browser;
pub use page::PageScraper;
pub use web::WebDriverBrowser;
