// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Streams AlphaHub trade signals to the log.
//!
//! Algorithm channels are taken from the command line, with a default set
//! when none are given. Credentials are resolved from `ALPHAHUB_EMAIL` and
//! `ALPHAHUB_PASSWORD`, loading a local `.env` file when present. Ctrl-C
//! requests a graceful stop.

use std::env;

use alphahub_client::{
    AlphaHubFeedClient, Credential, FeedConfig, common::consts::DEFAULT_ALGO_IDS,
};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let algo_ids = parse_algo_ids(env::args().skip(1))?;
    let credential = Credential::from_env()?;
    let mut client = AlphaHubFeedClient::new(FeedConfig::new(algo_ids), credential)?;

    let handle = client.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received; stopping");
            handle.stop();
        }
    });

    client.run().await?;
    Ok(())
}

fn parse_algo_ids(args: impl Iterator<Item = String>) -> anyhow::Result<Vec<u32>> {
    let mut ids = Vec::new();
    for arg in args {
        let id = arg
            .parse::<u32>()
            .with_context(|| format!("invalid algorithm id: {arg}"))?;
        ids.push(id);
    }
    if ids.is_empty() {
        ids = DEFAULT_ALGO_IDS.to_vec();
    }
    Ok(ids)
}
