use crate::config::Config;
use crate::error::{Result, TranstatError};
use crate::model::{MergedPullRequest, PullRequestPage};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
const ACCEPT_PREVIEW: &str = "application/vnd.github.ocelot-preview+json";
const USER_AGENT: &str = concat!("transtat/", env!("CARGO_PKG_VERSION"));

const MERGED_PR_QUERY: &str = "\
query($owner: String!, $name: String!, $labels: [String!], $cursor: String) {
    repository(name: $name, owner: $owner) {
        pullRequests(first: 100, states: MERGED, labels: $labels, after: $cursor) {
            pageInfo {
                endCursor
                hasNextPage
            }
            edges {
                node {
                    number
                    author {
                        login
                    }
                    baseRef {
                        name
                    }
                    mergedAt
                }
            }
        }
    }
}";

/// One page of merged, labeled pull requests, in upstream order.
pub trait PageSource {
    fn fetch_page(&self, cursor: Option<&str>) -> Result<PullRequestPage>;
}

/// Raw unified diff text for a single pull request.
pub trait DiffSource {
    fn fetch_diff(&self, number: u64) -> Result<String>;
}

pub struct GithubClient {
    http: Client,
    token: String,
    owner: String,
    name: String,
    label: String,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            token: config.github_token.clone(),
            owner: config.repository.owner.clone(),
            name: config.repository.name.clone(),
            label: config.repository.trans_label.clone(),
        })
    }

    fn diff_url(&self, number: u64) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}.diff",
            self.owner, self.name, number
        )
    }
}

impl PageSource for GithubClient {
    fn fetch_page(&self, cursor: Option<&str>) -> Result<PullRequestPage> {
        let body = json!({
            "query": MERGED_PR_QUERY,
            "variables": {
                "owner": self.owner,
                "name": self.name,
                "labels": [self.label],
                "cursor": cursor,
            },
        });

        let response = self
            .http
            .post(GRAPHQL_ENDPOINT)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, ACCEPT_PREVIEW)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranstatError::Status {
                url: GRAPHQL_ENDPOINT.to_string(),
                status: status.as_u16(),
            });
        }

        let raw = response.text()?;
        let reply: GraphQlResponse = serde_json::from_str(&raw)?;
        if let Some(error) = reply.errors.first() {
            return Err(TranstatError::Protocol(error.message.clone()));
        }

        let connection = reply
            .data
            .and_then(|data| data.repository)
            .ok_or_else(|| {
                TranstatError::Protocol("response carries no repository data".to_string())
            })?
            .pull_requests;

        let items = connection
            .edges
            .into_iter()
            .map(|edge| {
                let node = edge.node;
                MergedPullRequest {
                    number: node.number,
                    // Deleted accounts come back with a null author.
                    author: node
                        .author
                        .map(|author| author.login)
                        .unwrap_or_else(|| "ghost".to_string()),
                    merged_at: node.merged_at,
                    base_branch: node
                        .base_ref
                        .map(|base| base.name)
                        .unwrap_or_default(),
                }
            })
            .collect();

        Ok(PullRequestPage {
            items,
            end_cursor: connection.page_info.end_cursor,
            has_next: connection.page_info.has_next_page,
        })
    }
}

impl DiffSource for GithubClient {
    fn fetch_diff(&self, number: u64) -> Result<String> {
        let url = self.diff_url(number);
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranstatError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_requests: PullRequestConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    page_info: PageInfo,
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
struct Edge {
    node: PullRequestNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    author: Option<Author>,
    base_ref: Option<BaseRef>,
    merged_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Author {
    login: String,
}

#[derive(Deserialize)]
struct BaseRef {
    name: String,
}
