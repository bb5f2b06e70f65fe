// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Transport};
use anyhow::{Context, Result};

pub fn handle<T: Transport>(client: &ApiClient<T>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim();
            let password = sub.get_one::<String>("password").unwrap();
            let user = client.login(email, password).context("Login failed")?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Some(("register", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim();
            let password = sub.get_one::<String>("password").unwrap();
            let user = client
                .register(name, email, password)
                .context("Registration failed")?;
            println!("Registered and signed in as {} <{}>", user.name, user.email);
        }
        Some(("logout", _)) => {
            client.logout()?;
            println!("Signed out");
        }
        Some(("whoami", _)) => {
            if !client.session()?.is_authenticated() {
                println!("Not signed in");
                return Ok(());
            }
            let user = client.me()?;
            println!("{} <{}> (id {})", user.name, user.email, user.id);
        }
        _ => {}
    }
    Ok(())
}
