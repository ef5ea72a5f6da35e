use std::io::Read;

use anyhow::Result;

use termfolio_core::markup::{tokenize, Token};

pub fn run(fragment: &str, json: bool) -> Result<()> {
    let input = if fragment == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fragment.to_string()
    };

    let tokens = tokenize(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    for token in &tokens {
        match token {
            Token::Text { ch } => println!("text  {:?}", ch),
            Token::TagOpen { markup } => println!("open  {}", markup),
            Token::TagClose { markup } => println!("close {}", markup),
        }
    }
    println!("\n{} tokens", tokens.len());

    Ok(())
}
