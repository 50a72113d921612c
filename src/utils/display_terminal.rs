//! Startup banner printed by `main`.

/// Prints a title inside a box of fixed width.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║              Delius Community API                ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

/// Prints an indented `name: value` line under a title.
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// Prints the banner with the settings the server started with.
pub fn print_startup_summary(environment: &str, data_store: &str, bind_address: &str) {
    println!();
    print_boxed_title("Delius Community API");
    print_sub_task("Environment", environment);
    print_sub_task("Data store", data_store);
    print_sub_task("Listening on", bind_address);
    println!();
}
