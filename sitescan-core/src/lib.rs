pub mod crawl;
pub mod report;

pub fn print_banner() {
    println!(
        r#"
   _____ _ __
  / ___/(_) /____  ______________ _____
  \__ \/ / __/ _ \/ ___/ ___/ __ `/ __ \
 ___/ / / /_/  __(__  ) /__/ /_/ / / / /
/____/_/\__/\___/____/\___/\__,_/_/ /_/  v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
