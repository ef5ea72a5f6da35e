use anyhow::Result;

use termfolio_core::Page;

pub fn run(page: &Page) -> Result<()> {
    if page.commands.is_empty() {
        println!("No commands on this page.");
        println!("\nA command looks like:");
        println!("  <div class=\"command\" data-target=\"about\">...</div>");
        return Ok(());
    }

    println!("Commands ({}):\n", page.commands.len());

    for (index, command) in page.commands.iter().enumerate() {
        let missing = if page.output_of(command).is_none() {
            " [no output]"
        } else {
            ""
        };
        println!("  {}. {} -> #{}{}", index + 1, command.label, command.target, missing);
    }

    Ok(())
}
