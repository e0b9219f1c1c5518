//! Transaction builder step definitions.

use std::sync::Arc;

use cucumber::{given, then, when, World};
use sui_sync_client::mock::MockSigner;
use sui_sync_client::{
    build, ArgInput, Argument, ClientError, MoveTarget, ObjectId, SuiAddress, TransactionExecutor,
    TransactionRequest,
};

/// Test context for TransactionBuilder scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct TransactionBuilderWorld {
    target: Option<MoveTarget>,
    signer: Arc<MockSigner>,
    built: Vec<TransactionRequest>,
    build_error: Option<ClientError>,
}

impl std::fmt::Debug for TransactionBuilderWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBuilderWorld")
            .field("target", &self.target)
            .field("signer_calls", &self.signer.calls())
            .field("built", &self.built)
            .field("build_error", &self.build_error)
            .finish()
    }
}

impl TransactionBuilderWorld {
    fn new() -> Self {
        Self {
            target: None,
            signer: Arc::new(MockSigner::confirming("digest")),
            built: Vec::new(),
            build_error: None,
        }
    }

    /// Build, and only submit when validation passed.
    async fn build_and_submit(&mut self, operation: &str, args: Vec<ArgInput>) {
        let target = self.target.clone().expect("target not set");
        match build(operation, &target, &args) {
            Ok(request) => {
                let _ = self.signer.sign_and_execute(&request).await;
                self.built.push(request);
            }
            Err(e) => self.build_error = Some(e),
        }
    }

    fn request(&self) -> &TransactionRequest {
        self.built.first().expect("request not built")
    }
}

// --- Background ---

#[given(expr = "package {string} and module {string}")]
async fn given_target(world: &mut TransactionBuilderWorld, package: String, module: String) {
    world.target = Some(MoveTarget::new(&package, &module).expect("valid target"));
}

// --- When steps ---

#[when(expr = "I build {string} with object {string}")]
async fn when_build_with_object(world: &mut TransactionBuilderWorld, op: String, id: String) {
    world
        .build_and_submit(&op, vec![ArgInput::object(id)])
        .await;
}

#[when(expr = "I build {string} with object {string} twice")]
async fn when_build_twice(world: &mut TransactionBuilderWorld, op: String, id: String) {
    let target = world.target.clone().expect("target not set");
    for _ in 0..2 {
        let request = build(&op, &target, &[ArgInput::object(id.clone())]).expect("valid request");
        world.built.push(request);
    }
}

#[when(expr = "I build {string} with object {string}, amount {string} and recipient {string}")]
async fn when_build_mint(
    world: &mut TransactionBuilderWorld,
    op: String,
    id: String,
    amount: String,
    recipient: String,
) {
    let amount: i128 = amount.parse().expect("amount should be an integer");
    world
        .build_and_submit(
            &op,
            vec![
                ArgInput::object(id),
                ArgInput::u64(amount),
                ArgInput::address(recipient),
            ],
        )
        .await;
}

// --- Then steps ---

#[then("the build should succeed")]
async fn then_build_succeeds(world: &mut TransactionBuilderWorld) {
    assert!(world.build_error.is_none(), "{:?}", world.build_error);
    assert!(!world.built.is_empty());
}

#[then(expr = "argument {int} should be object {string}")]
async fn then_arg_is_object(world: &mut TransactionBuilderWorld, index: usize, id: String) {
    assert_eq!(
        world.request().arguments()[index],
        Argument::ObjectRef(ObjectId::new(id).unwrap())
    );
}

#[then(expr = "argument {int} should be u64 {string}")]
async fn then_arg_is_u64(world: &mut TransactionBuilderWorld, index: usize, value: String) {
    let value: u64 = value.parse().unwrap();
    assert_eq!(world.request().arguments()[index], Argument::U64(value));
}

#[then(expr = "argument {int} should be address {string}")]
async fn then_arg_is_address(world: &mut TransactionBuilderWorld, index: usize, addr: String) {
    assert_eq!(
        world.request().arguments()[index],
        Argument::Address(SuiAddress::parse(&addr).unwrap())
    );
}

#[then(expr = "the call target should end with {string}")]
async fn then_call_target_ends_with(world: &mut TransactionBuilderWorld, suffix: String) {
    assert!(world.request().call_target().ends_with(&suffix));
}

#[then("both requests should be equal")]
async fn then_requests_equal(world: &mut TransactionBuilderWorld) {
    assert_eq!(world.built.len(), 2);
    assert_eq!(world.built[0], world.built[1]);
}

#[then("building should fail with an invalid argument")]
async fn then_invalid_argument(world: &mut TransactionBuilderWorld) {
    let err = world.build_error.as_ref().expect("expected error");
    assert!(err.is_invalid_argument(), "{:?}", err);
}

#[then(expr = "the error should mention {string}")]
async fn then_error_mentions(world: &mut TransactionBuilderWorld, text: String) {
    let err = world.build_error.as_ref().expect("expected error");
    assert!(err.message().contains(&text), "{}", err.message());
}

#[then("the signer should not have been called")]
async fn then_signer_not_called(world: &mut TransactionBuilderWorld) {
    assert_eq!(world.signer.calls(), 0);
}
