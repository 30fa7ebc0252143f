// UI layer: provides a simple interactive menu using `dialoguer`.
// Screens collect their form fields here and hand them to the `Shell`;
// whatever `Notice` comes back is printed.

use crate::api::{CarOwnership, HouseOwnership, MaritalStatus, PredictionRequest};
use crate::shell::{Notice, Shell, MSG_LOGIN_FIRST};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const MENU: [&str; 6] = ["Register", "Login", "Predict", "Logs", "Chat with AI", "Exit"];

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu(mut shell: Shell) -> Result<()> {
    println!("{}", "Credit Risk Prediction and Chat with AI".bold());
    loop {
        if let Some(user) = shell.session().username() {
            println!("{}", format!("Logged in as {}", user).dim());
        }
        let selection = Select::new()
            .with_prompt("Menu")
            .items(&MENU[..])
            .default(0)
            .interact()?;
        match selection {
            0 => register_screen(&shell)?,
            1 => login_screen(&mut shell)?,
            2 => predict_screen(&shell)?,
            3 => logs_screen(&shell),
            4 => chat_screen(&mut shell)?,
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Print a notice with a color matching its kind.
pub fn render(notice: &Notice) {
    match notice {
        Notice::Success(msg) => println!("{}", msg.as_str().green()),
        Notice::Error(msg) => println!("{}", msg.as_str().red()),
        Notice::Warning(msg) => println!("{}", msg.as_str().yellow()),
        Notice::Info(msg) => println!("{}", msg),
        Notice::Table(table) => {
            println!("{}", "Prediction Log".bold());
            print!("{}", table);
        }
    }
}

/// Run a blocking backend call behind a spinner.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

fn prompt_credentials() -> Result<(String, String)> {
    let username: String = Input::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()?;
    let password: String = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok((username, password))
}

fn register_screen(shell: &Shell) -> Result<()> {
    println!("{}", "Register a new user".bold());
    let (username, password) = prompt_credentials()?;
    let notice = with_spinner("Registering...", || shell.register(&username, &password));
    render(&notice);
    Ok(())
}

fn login_screen(shell: &mut Shell) -> Result<()> {
    println!("{}", "Login".bold());
    let (username, password) = prompt_credentials()?;
    let notice = with_spinner("Logging in...", || shell.login(&username, &password));
    render(&notice);
    Ok(())
}

fn pick<T: Copy>(prompt: &str, options: &[T], label: fn(T) -> &'static str) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|o| label(*o)).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[idx])
}

fn number<T>(prompt: &str) -> Result<T>
where
    T: Clone + Default + std::fmt::Display + std::str::FromStr,
    T::Err: std::fmt::Display + std::fmt::Debug,
{
    Ok(Input::<T>::new()
        .with_prompt(prompt)
        .default(T::default())
        .interact_text()?)
}

fn text(prompt: &str) -> Result<String> {
    Ok(Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

fn predict_screen(shell: &Shell) -> Result<()> {
    println!("{}", "Credit Risk Prediction".bold());
    if !shell.session().is_logged_in() {
        render(&Notice::Warning(MSG_LOGIN_FIRST.into()));
        return Ok(());
    }

    let req = PredictionRequest {
        income: number("Income")?,
        age: number("Age")?,
        experience: number("Experience")?,
        married_single: pick("Married/Single", &MaritalStatus::ALL, MaritalStatus::as_str)?,
        house_ownership: pick("House Ownership", &HouseOwnership::ALL, HouseOwnership::as_str)?,
        car_ownership: pick("Car Ownership", &CarOwnership::ALL, CarOwnership::as_str)?,
        profession: text("Profession")?,
        city: text("City")?,
        state: text("State")?,
        current_job_yrs: number("Current Job Years")?,
        current_house_yrs: number("Current House Years")?,
    };

    let notice = with_spinner("Predicting...", || shell.predict(&req));
    render(&notice);
    Ok(())
}

fn logs_screen(shell: &Shell) {
    println!("{}", "Prediction Logs".bold());
    if !shell.session().is_logged_in() {
        render(&Notice::Warning(MSG_LOGIN_FIRST.into()));
        return;
    }
    let notice = with_spinner("Fetching logs...", || shell.logs());
    render(&notice);
}

/// Chat loop; an empty line returns to the menu.
fn chat_screen(shell: &mut Shell) -> Result<()> {
    println!("{}", "Chat with AI (empty line to go back)".bold());
    loop {
        let message: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        if message.trim().is_empty() {
            return Ok(());
        }
        let notice = with_spinner("Thinking...", || shell.chat(&message));
        let stop = matches!(notice, Notice::Warning(_));
        render(&notice);
        if stop {
            return Ok(());
        }
    }
}
