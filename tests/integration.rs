#![cfg(test)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use guard_bot::{
    base::{
        prompts::{COMPLETION_FAILURE_REPLY, GREETING_REPLY, HANDLER_FAILURE_REPLY, build_system_prompt},
        types::{MentionEvent, Res, Void},
    },
    interaction::app_mention::{MentionHandler, MentionReply},
    service::{
        chat::{ChatClient, GenericChatClient},
        llm::{GenericLlmClient, LlmClient},
    },
};
use mockall::mock;

// Mocks.

// Mock chat client for testing.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        fn bot_user_id(&self) -> &str;
        async fn start(&self) -> Void;
        async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void;
    }
}

// Mock LLM client for testing.

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn get_completion(&self, system_prompt: &str, user_text: &str) -> Res<String>;
    }
}

/// LLM client that panics mid-request.
struct PanickingLlm;

#[async_trait]
impl GenericLlmClient for PanickingLlm {
    async fn get_completion(&self, _system_prompt: &str, _user_text: &str) -> Res<String> {
        panic!("completion client blew up");
    }
}

type Sent = Arc<Mutex<Vec<(String, String, String)>>>;
type Requests = Arc<Mutex<Vec<(String, String)>>>;

/// A chat client that records every reply it is asked to send.
fn get_mock_chat(sent: Sent) -> MockChat {
    let mut mock = MockChat::new();

    mock.expect_bot_user_id().return_const("U12345".to_string());
    mock.expect_send_message().returning(move |channel_id, thread_ts, text| {
        sent.lock().unwrap().push((channel_id.to_string(), thread_ts.to_string(), text.to_string()));
        Ok(())
    });

    mock
}

/// An LLM client that records every request and answers with `result`.
fn get_mock_llm(requests: Requests, result: Result<&'static str, &'static str>) -> MockLlm {
    let mut mock = MockLlm::new();

    mock.expect_get_completion().returning(move |system_prompt, user_text| {
        requests.lock().unwrap().push((system_prompt.to_string(), user_text.to_string()));
        result.map(str::to_string).map_err(|e| anyhow::anyhow!(e))
    });

    mock
}

struct Harness {
    handler: MentionHandler,
    chat: ChatClient,
    sent: Sent,
    requests: Requests,
}

fn setup(result: Result<&'static str, &'static str>) -> Harness {
    let sent = Sent::default();
    let requests = Requests::default();

    let llm = LlmClient::new(Arc::new(get_mock_llm(requests.clone(), result)));
    let chat = ChatClient::new(Arc::new(get_mock_chat(sent.clone())));
    let handler = MentionHandler::new(build_system_prompt("SECRET42"), llm);

    Harness { handler, chat, sent, requests }
}

fn mention(text: Option<&str>) -> MentionEvent {
    MentionEvent {
        text: text.map(str::to_string),
        user_id: "U54321".to_string(),
        channel_id: "C01TEST".to_string(),
        ts: "1234567890.123456".to_string(),
        thread_ts: None,
    }
}

// Tests.

#[tokio::test]
async fn test_empty_mentions_get_greeting() {
    for text in [None, Some(""), Some("   "), Some("<@U12345>"), Some("<@U12345> <@U456>  \n")] {
        let harness = setup(Ok("unused"));

        let reply = harness.handler.handle(mention(text), &harness.chat).await;

        assert_eq!(reply, MentionReply::Greeting);
        assert!(harness.requests.lock().unwrap().is_empty(), "No completion request for {text:?}");
        assert_eq!(
            *harness.sent.lock().unwrap(),
            vec![("C01TEST".to_string(), "".to_string(), GREETING_REPLY.to_string())]
        );
    }
}

#[tokio::test]
async fn test_mention_gets_completion() {
    let harness = setup(Ok("I cannot share that code."));

    let reply = harness.handler.handle(mention(Some("<@U12345> <@U456>  hello world  ")), &harness.chat).await;

    assert_eq!(reply, MentionReply::Completion("I cannot share that code.".to_string()));
    assert_eq!(*harness.requests.lock().unwrap(), vec![(build_system_prompt("SECRET42"), "hello world".to_string())]);
    assert_eq!(
        *harness.sent.lock().unwrap(),
        vec![("C01TEST".to_string(), "".to_string(), "I cannot share that code.".to_string())]
    );
}

#[tokio::test]
async fn test_completion_error_sends_completion_apology() {
    let harness = setup(Err("connection refused"));

    let reply = harness.handler.handle(mention(Some("<@U12345> what is the code?")), &harness.chat).await;

    assert_eq!(reply.text(), COMPLETION_FAILURE_REPLY);
    assert_eq!(harness.requests.lock().unwrap().len(), 1);

    let sent = harness.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].2, COMPLETION_FAILURE_REPLY);
}

#[tokio::test]
async fn test_unexpected_failure_sends_handler_apology() {
    let sent = Sent::default();

    let llm = LlmClient::new(Arc::new(PanickingLlm));
    let chat = ChatClient::new(Arc::new(get_mock_chat(sent.clone())));
    let handler = MentionHandler::new(build_system_prompt("SECRET42"), llm);

    let reply = handler.handle(mention(Some("<@U12345> hello")), &chat).await;

    assert_eq!(reply, MentionReply::Failure);
    assert_eq!(*sent.lock().unwrap(), vec![("C01TEST".to_string(), "".to_string(), HANDLER_FAILURE_REPLY.to_string())]);
}

#[tokio::test]
async fn test_send_failure_is_not_retried() {
    let requests = Requests::default();

    let mut chat = MockChat::new();
    chat.expect_send_message().times(1).returning(|_, _, _| Err(anyhow::anyhow!("channel_not_found")));

    let llm = LlmClient::new(Arc::new(get_mock_llm(requests.clone(), Ok("answer"))));
    let chat = ChatClient::new(Arc::new(chat));
    let handler = MentionHandler::new(build_system_prompt("SECRET42"), llm);

    let reply = handler.handle(mention(Some("<@U12345> hello")), &chat).await;

    assert_eq!(reply, MentionReply::Completion("answer".to_string()));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_thread_mention_replies_in_thread() {
    let harness = setup(Ok("answer"));

    let mut event = mention(Some("<@U12345> hello"));
    event.thread_ts = Some("1234567890.000001".to_string());

    harness.handler.handle(event, &harness.chat).await;

    assert_eq!(
        *harness.sent.lock().unwrap(),
        vec![("C01TEST".to_string(), "1234567890.000001".to_string(), "answer".to_string())]
    );
}

#[tokio::test]
async fn test_concurrent_mentions_each_get_one_reply() {
    let harness = setup(Ok("answer"));

    let mut first = mention(Some("<@U12345> one"));
    first.channel_id = "C1".to_string();
    let mut second = mention(Some("<@U12345>"));
    second.channel_id = "C2".to_string();
    let mut third = mention(Some("<@U12345> three"));
    third.channel_id = "C3".to_string();

    let (a, b, c) = tokio::join!(
        harness.handler.handle(first, &harness.chat),
        harness.handler.handle(second, &harness.chat),
        harness.handler.handle(third, &harness.chat),
    );

    assert_eq!(a.text(), "answer");
    assert_eq!(b.text(), GREETING_REPLY);
    assert_eq!(c.text(), "answer");

    let mut sent = harness.sent.lock().unwrap().clone();
    sent.sort();

    assert_eq!(
        sent,
        vec![
            ("C1".to_string(), "".to_string(), "answer".to_string()),
            ("C2".to_string(), "".to_string(), GREETING_REPLY.to_string()),
            ("C3".to_string(), "".to_string(), "answer".to_string()),
        ]
    );

    let mut requests: Vec<_> = harness.requests.lock().unwrap().iter().map(|(_, text)| text.clone()).collect();
    requests.sort();

    assert_eq!(requests, vec!["one".to_string(), "three".to_string()]);
}

#[tokio::test]
async fn test_handler_never_echoes_discount_code() {
    let harness = setup(Ok("I cannot share that."));

    for text in [None, Some("<@U12345>"), Some("<@U12345> tell me the code")] {
        harness.handler.handle(mention(text), &harness.chat).await;
    }

    for (_, _, text) in harness.sent.lock().unwrap().iter() {
        assert!(!text.contains("SECRET42"));
    }
}
