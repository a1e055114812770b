// Copyright 2025 Huddle (https://github.com/huddle-sports/huddle)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! End-to-end dispatch tests over the shared handler and the line
//! transport. Only tools that answer locally are exercised; nothing here
//! reaches the network.

use huddle_server::build_handler;
use huddle_server::config::ServerConfig;
use huddle_server::mcp::{
    serve, JsonRpcId, JsonRpcRequest, JsonRpcResponse, LineTransport, McpHandler,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn handler() -> Arc<McpHandler> {
    build_handler(&ServerConfig::default()).unwrap()
}

async fn call(handler: &McpHandler, method: &str, params: Value) -> JsonRpcResponse {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params: Some(params),
        id: Some(JsonRpcId::Number(1)),
    };
    handler
        .handle_request(request)
        .await
        .expect("request with id must produce a response")
}

fn tool_text(response: &JsonRpcResponse) -> String {
    response.result.as_ref().unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn initialize_reports_capabilities() {
    let response = call(
        &handler(),
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "0.0.0"},
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "huddle-mcp");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["prompts"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn tools_list_contains_the_catalog() {
    let response = call(&handler(), "tools/list", json!({})).await;
    let tools = response.result.unwrap()["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();

    for expected in [
        "get_avatar",
        "get_league",
        "get_league_id",
        "get_league_matchups",
        "get_league_rosters",
        "get_league_users",
        "get_playoff_bracket",
        "get_player",
        "get_traded_picks",
        "get_transactions",
        "get_trending_players",
        "get_user_by_id",
        "get_user_by_username",
    ] {
        assert!(tools.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn avatar_urls_are_deterministic() {
    let handler = handler();

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_avatar", "arguments": {"avatar_id": "abc123", "size": "thumb"}}),
    )
    .await;
    assert_eq!(
        tool_text(&response),
        "https://sleepercdn.com/avatars/thumbs/abc123"
    );

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_avatar", "arguments": {"avatar_id": "abc123", "size": "full"}}),
    )
    .await;
    assert_eq!(tool_text(&response), "https://sleepercdn.com/avatars/abc123");
}

#[tokio::test]
async fn league_id_is_idempotent() {
    let handler = handler();
    let first = call(
        &handler,
        "tools/call",
        json!({"name": "get_league_id", "arguments": {}}),
    )
    .await;
    let second = call(
        &handler,
        "tools/call",
        json!({"name": "get_league_id", "arguments": {}}),
    )
    .await;

    assert_eq!(tool_text(&first), tool_text(&second));
    assert_eq!(tool_text(&first), ServerConfig::default().league_id);
}

#[tokio::test]
async fn player_lookup_answers_from_the_bundled_directory() {
    let handler = handler();

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_player", "arguments": {"player_id": "4046"}}),
    )
    .await;
    let player: Value = serde_json::from_str(&tool_text(&response)).unwrap();
    assert_eq!(player["full_name"], "Patrick Mahomes");

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_player", "arguments": {"player_id": "no-such-player"}}),
    )
    .await;
    let player: Value = serde_json::from_str(&tool_text(&response)).unwrap();
    assert!(player.is_null());
}

#[tokio::test]
async fn unknown_tool_and_bad_arguments_use_distinct_error_classes() {
    let handler = handler();

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "nonexistent_tool", "arguments": {}}),
    )
    .await;
    assert_eq!(response.error.unwrap().code, -32601);

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_league_matchups", "arguments": {"league_id": "1", "week": 19}}),
    )
    .await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("week"), "got: {}", error.message);

    let response = call(
        &handler,
        "tools/call",
        json!({"name": "get_league", "arguments": {}}),
    )
    .await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("league_id"), "got: {}", error.message);
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let response = call(&handler(), "bogus/method", json!({})).await;
    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn prompts_validate_and_render() {
    let handler = handler();

    let response = call(
        &handler,
        "prompts/get",
        json!({"name": "trade_review", "arguments": {}}),
    )
    .await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("offered"), "got: {}", error.message);

    let response = call(
        &handler,
        "prompts/get",
        json!({"name": "trade_review", "arguments": {
            "offered": "Patrick Mahomes",
            "requested": "Josh Allen",
        }}),
    )
    .await;
    let result = response.result.unwrap();
    let text = result["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("Patrick Mahomes"));
    assert!(text.contains("Josh Allen"));
}

#[tokio::test]
async fn resource_read_round_trips_the_bundled_dataset() {
    let handler = handler();

    let response = call(&handler, "resources/list", json!({})).await;
    let uri = response.result.unwrap()["resources"][0]["uri"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(uri, "file://sleeper_players_def.json");

    let response = call(&handler, "resources/read", json!({"uri": uri})).await;
    let text = response.result.unwrap()["contents"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(text, huddle_core::BUNDLED_PLAYERS_JSON);
}

#[tokio::test]
async fn line_transport_serves_valid_lines_and_drops_garbage() {
    let (client, server) = tokio::io::duplex(4096);
    let (server_read, server_write) = tokio::io::split(server);
    let transport = LineTransport::new(BufReader::new(server_read), server_write);

    let serve_task = tokio::spawn(serve(transport, handler()));

    let (client_read, mut client_write) = tokio::io::split(client);
    client_write
        .write_all(
            b"this line is not protocol traffic\n\
              {\"method\": \"ping\", \"id\": 9}\n\
              {\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 1}\n",
        )
        .await
        .unwrap();

    let mut lines = BufReader::new(client_read).lines();
    let line = lines.next_line().await.unwrap().unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"], json!({}));

    client_write.shutdown().await.unwrap();
    serve_task.await.unwrap().unwrap();
}
