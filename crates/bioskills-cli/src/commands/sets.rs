use bioskills_core::Catalog;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for technique in &catalog.techniques {
        if technique.coming_soon {
            println!("{} {} (coming soon)", technique.icon, technique.title);
            continue;
        }
        println!("{} {}", technique.icon, technique.title);
        for set in &technique.sets {
            let marker = if set.calculation { "  [calculation]" } else { "" };
            println!("    {:<8} {:<30} {}{marker}", set.id, set.title, set.resource);
        }
    }

    if !catalog.library.is_empty() {
        println!();
        println!("📚 The Library");
        for article in &catalog.library {
            let marker = if article.coming_soon { " (coming soon)" } else { "" };
            println!(
                "    {} ({}, {}){marker}",
                article.title, article.author, article.year
            );
        }
    }
    Ok(())
}
