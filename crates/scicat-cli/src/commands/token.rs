//! Token command - log in and print an access token.

pub fn run(url: String, username: String, password: String) -> Result<(), Box<dyn std::error::Error>> {
    let token = scicat::get_token(&url, &username, &password)?;
    println!("{}", token);
    Ok(())
}
