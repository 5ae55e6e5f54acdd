//! Integration tests for the drop store and its token ledgers.
//!
//! Each contract lives in its own mocked `OwnedDeps` and is driven through
//! its `instantiate` / `execute` / `query` entry points. Mint messages the
//! store emits are routed into the collectible ledger with the store as
//! sender, and pass-ledger balance queries are answered from a snapshot of
//! the pass ledger via `MockQuerier::update_wasm`.
//!
//! Run:
//! ```bash
//! cargo test -p drop-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, ContractResult, CosmosMsg, Env, MemoryStorage,
    OwnedDeps, Response, SystemError, SystemResult, Timestamp, Uint128, WasmMsg, WasmQuery,
};
use drop_common::{
    signing_digest, BalanceResponse, LedgerExecuteMsg, LedgerQueryMsg, PassReq, Phase,
    TypedDataDomain,
};
use drop_store::msg::{ExecuteMsg as StoreExecuteMsg, QueryMsg as StoreQueryMsg, TreasuryResponse};
use drop_store::state::{ClaimResult, InventoryState, RaffleGeometry, TicketRecord};
use drop_store::ContractError as StoreError;
use drop_token_ledger::msg::{
    ExecuteMsg as LedgerExecute, InstantiateMsg as LedgerInstantiate, LedgerKindMsg,
    QueryMsg as LedgerQuery,
};
use k256::ecdsa::SigningKey;

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const DENOM: &str = "uatom";
const PRICE: u128 = 80_000_000;
const VIP_WINDOW: u64 = 3 * 3600;
const PUBLIC_WINDOW: u64 = 24 * 3600;
const OPENING: u64 = 1_700_000_000;
const PASS_NAME: &str = "Drop Pass";

// ─── Helpers ───

fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

fn pubkey_hex(key: &SigningKey) -> String {
    hex::encode(key.verifying_key().to_encoded_point(false).as_bytes())
}

/// Sign `PassReq { receiver, amount }` for the contract and chain in `env`.
fn sign_pass_req(key: &SigningKey, name: &str, env: &Env, receiver: &Addr, amount: u64) -> String {
    let domain = TypedDataDomain::new(name, &env.block.chain_id, env.contract.address.as_str());
    let digest = signing_digest(
        &domain,
        &PassReq {
            receiver: receiver.to_string(),
            amount: u128::from(amount),
        },
    );
    let (sig, recid) = key.sign_prehash_recoverable(&digest).unwrap();
    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(recid.to_byte() + 27);
    hex::encode(bytes)
}

fn refunds(res: &Response) -> u128 {
    res.messages
        .iter()
        .filter_map(|m| match &m.msg {
            CosmosMsg::Bank(BankMsg::Send { amount, .. }) => Some(amount[0].amount.u128()),
            _ => None,
        })
        .sum()
}

struct SaleParams {
    max_supply: u64,
    max_pre_mint: u64,
    max_per_allowlist_address: u64,
    max_mint_per_tx: u64,
}

impl Default for SaleParams {
    fn default() -> Self {
        SaleParams {
            max_supply: 10_000,
            max_pre_mint: 20,
            max_per_allowlist_address: 5,
            max_mint_per_tx: 30,
        }
    }
}

/// A store wired to a collectible ledger and a claimable pass ledger.
struct Sale {
    api: MockApi,
    store: TestDeps,
    collectible: TestDeps,
    pass: TestDeps,
    store_addr: Addr,
    collectible_addr: Addr,
    pass_addr: Addr,
    owner: Addr,
    signer: SigningKey,
    accounts: Vec<Addr>,
    now: u64,
}

impl Sale {
    fn new(params: SaleParams) -> Self {
        let api = MockApi::default();
        let owner = api.addr_make("owner");
        let store_addr = api.addr_make("store_contract");
        let collectible_addr = api.addr_make("collectible_contract");
        let pass_addr = api.addr_make("pass_contract");
        let signer = signing_key(42);

        let mut sale = Sale {
            api,
            store: mock_dependencies(),
            collectible: mock_dependencies(),
            pass: mock_dependencies(),
            store_addr,
            collectible_addr,
            pass_addr,
            owner: owner.clone(),
            signer,
            accounts: vec![],
            now: OPENING - 100,
        };

        let env = sale.env_for(&sale.collectible_addr.clone());
        drop_token_ledger::contract::instantiate(
            sale.collectible.as_mut(),
            env,
            message_info(&owner, &[]),
            LedgerInstantiate {
                name: "Drop Collectible".to_string(),
                kind: LedgerKindMsg::Collectible,
                minter: Some(sale.store_addr.to_string()),
                base_uri: "https://drop.example/meta/".to_string(),
                max_supply: Some(params.max_supply),
            },
        )
        .unwrap();

        let env = sale.env_for(&sale.pass_addr.clone());
        drop_token_ledger::contract::instantiate(
            sale.pass.as_mut(),
            env,
            message_info(&owner, &[]),
            LedgerInstantiate {
                name: PASS_NAME.to_string(),
                kind: LedgerKindMsg::ClaimablePass {
                    signer_pubkey_hex: pubkey_hex(&sale.signer),
                },
                minter: None,
                base_uri: "https://drop.example/pass".to_string(),
                max_supply: Some(1_000),
            },
        )
        .unwrap();

        let env = sale.env_for(&sale.store_addr.clone());
        drop_store::contract::instantiate(
            sale.store.as_mut(),
            env,
            message_info(&owner, &[]),
            drop_store::msg::InstantiateMsg {
                token_ledger: sale.collectible_addr.to_string(),
                pass_ledger: sale.pass_addr.to_string(),
                signer_pubkey_hex: Some(pubkey_hex(&sale.signer)),
                denom: DENOM.to_string(),
                unit_price: Uint128::new(PRICE),
                max_supply: params.max_supply,
                max_pre_mint: params.max_pre_mint,
                max_per_allowlist_address: params.max_per_allowlist_address,
                max_mint_per_tx: params.max_mint_per_tx,
                vip_window_seconds: VIP_WINDOW,
                public_window_seconds: PUBLIC_WINDOW,
            },
        )
        .unwrap();

        sale.store_exec(&owner, 0, StoreExecuteMsg::SetOpeningTime { opening_time: OPENING })
            .unwrap();
        sale
    }

    fn account(&mut self, name: &str) -> Addr {
        let addr = self.api.addr_make(name);
        if !self.accounts.contains(&addr) {
            self.accounts.push(addr.clone());
        }
        addr
    }

    fn env_for(&self, contract: &Addr) -> Env {
        let mut env = mock_env();
        env.block.time = Timestamp::from_seconds(self.now);
        env.contract.address = contract.clone();
        env
    }

    fn enter_vip(&mut self) {
        self.now = OPENING + 1;
    }

    fn enter_public(&mut self) {
        self.now = OPENING + VIP_WINDOW;
    }

    fn enter_closed(&mut self) {
        self.now = OPENING + VIP_WINDOW + PUBLIC_WINDOW;
    }

    /// Install a handler answering pass balance queries from the pass ledger's current state.
    fn sync_pass_balances(&mut self) {
        let mut balances = vec![];
        for account in &self.accounts {
            balances.push((account.to_string(), self.pass_balance(account)));
        }
        let pass_addr = self.pass_addr.to_string();
        self.store.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, msg } if *contract_addr == pass_addr => {
                let LedgerQueryMsg::Balance { owner } = from_json(msg).unwrap();
                let count = balances
                    .iter()
                    .find(|(addr, _)| *addr == owner)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                SystemResult::Ok(ContractResult::Ok(
                    to_json_binary(&BalanceResponse { count }).unwrap(),
                ))
            }
            _ => SystemResult::Err(SystemError::NoSuchContract {
                addr: "unknown".to_string(),
            }),
        });
    }

    /// Execute on the store, then deliver its ledger mints as the store.
    fn store_exec(
        &mut self,
        sender: &Addr,
        paid: u128,
        msg: StoreExecuteMsg,
    ) -> Result<Response, StoreError> {
        self.sync_pass_balances();
        let funds = if paid == 0 { vec![] } else { coins(paid, DENOM) };
        let env = self.env_for(&self.store_addr);
        let res = drop_store::contract::execute(
            self.store.as_mut(),
            env,
            message_info(sender, &funds),
            msg,
        )?;

        for sub in &res.messages {
            if let CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            }) = &sub.msg
            {
                assert_eq!(*contract_addr, self.collectible_addr.to_string());
                let LedgerExecuteMsg::Mint { recipient } = from_json(msg).unwrap();
                let env = self.env_for(&self.collectible_addr);
                drop_token_ledger::contract::execute(
                    self.collectible.as_mut(),
                    env,
                    message_info(&self.store_addr, &[]),
                    LedgerExecute::Mint { recipient },
                )
                .unwrap();
            }
        }
        Ok(res)
    }

    fn store_query<T: serde::de::DeserializeOwned>(&self, msg: StoreQueryMsg) -> T {
        let env = self.env_for(&self.store_addr);
        from_json(drop_store::contract::query(self.store.as_ref(), env, msg).unwrap()).unwrap()
    }

    fn collectible_balance(&self, owner: &Addr) -> u64 {
        let env = self.env_for(&self.collectible_addr);
        let res: BalanceResponse = from_json(
            drop_token_ledger::contract::query(
                self.collectible.as_ref(),
                env,
                LedgerQuery::Balance {
                    owner: owner.to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        res.count
    }

    fn collectible_supply(&self) -> u64 {
        let env = self.env_for(&self.collectible_addr);
        from_json(
            drop_token_ledger::contract::query(self.collectible.as_ref(), env, LedgerQuery::NumTokens {})
                .unwrap(),
        )
        .unwrap()
    }

    fn pass_balance(&self, owner: &Addr) -> u64 {
        let env = self.env_for(&self.pass_addr);
        let res: BalanceResponse = from_json(
            drop_token_ledger::contract::query(
                self.pass.as_ref(),
                env,
                LedgerQuery::Balance {
                    owner: owner.to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        res.count
    }

    /// Open the pass claim window and let `who` claim `amount` passes.
    fn claim_passes(&mut self, who: &Addr, amount: u64) {
        let env = self.env_for(&self.pass_addr);
        let owner = self.owner.clone();
        drop_token_ledger::contract::execute(
            self.pass.as_mut(),
            env.clone(),
            message_info(&owner, &[]),
            LedgerExecute::SetClaimUntil {
                timestamp: self.now + 3600,
            },
        )
        .unwrap();
        let signature = sign_pass_req(&self.signer, PASS_NAME, &env, who, amount);
        drop_token_ledger::contract::execute(
            self.pass.as_mut(),
            env,
            message_info(who, &[]),
            LedgerExecute::ClaimPass {
                amount,
                signature_hex: signature,
            },
        )
        .unwrap();
    }

    fn take_tickets(&mut self, who: &Addr, amount: u64) -> Response {
        self.store_exec(
            who,
            PRICE * u128::from(amount),
            StoreExecuteMsg::TakeTickets { amount },
        )
        .unwrap()
    }

    fn run_raffle(&mut self, seed: u128) -> Result<Response, StoreError> {
        let owner = self.owner.clone();
        self.store_exec(
            &owner,
            0,
            StoreExecuteMsg::RunRaffle {
                seed: Uint128::new(seed),
            },
        )
    }

    fn resolve(&mut self, who: &Addr) -> Response {
        self.store_exec(who, 0, StoreExecuteMsg::ResolveMyResult {})
            .unwrap()
    }

    /// Claim until nothing is left; returns the number of units minted.
    fn claim_all(&mut self, who: &Addr) -> u64 {
        let before = self.collectible_balance(who);
        loop {
            match self.store_exec(who, 0, StoreExecuteMsg::ClaimWinnings {}) {
                Ok(_) => continue,
                Err(StoreError::NoValidTickets) => break,
                Err(e) => panic!("unexpected claim error: {}", e),
            }
        }
        self.collectible_balance(who) - before
    }

    fn geometry(&self) -> RaffleGeometry {
        let geometry: Option<RaffleGeometry> = self.store_query(StoreQueryMsg::Raffle {});
        geometry.unwrap()
    }
}

// ═══════════════════════════════════════════════════════════════
// Full lifecycle
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_full_sale_lifecycle() {
    let mut sale = Sale::new(SaleParams {
        max_supply: 40,
        max_pre_mint: 3,
        max_per_allowlist_address: 2,
        max_mint_per_tx: 4,
    });
    let owner = sale.owner.clone();
    let vault = sale.account("vault");
    let alice = sale.account("alice");
    let bob = sale.account("bob");
    let buyers: Vec<Addr> = ["carol", "dave", "erin", "frank", "grace"]
        .iter()
        .map(|name| sale.account(name))
        .collect();

    assert_eq!(sale.store_query::<Phase>(StoreQueryMsg::Phase {}), Phase::Unscheduled);

    // Alice claims 3 passes before the sale
    sale.claim_passes(&alice, 3);
    assert_eq!(sale.pass_balance(&alice), 3);

    // ── VIP ──
    sale.enter_vip();
    assert_eq!(sale.store_query::<Phase>(StoreQueryMsg::Phase {}), Phase::Vip);

    sale.store_exec(
        &owner,
        0,
        StoreExecuteMsg::PreMint {
            receiver: vault.to_string(),
        },
    )
    .unwrap();

    // 3 passes * 2 = 6 units for alice
    sale.store_exec(&alice, PRICE * 4, StoreExecuteMsg::MintWithPass { amount: 4 })
        .unwrap();
    sale.store_exec(&alice, PRICE * 2, StoreExecuteMsg::MintWithPass { amount: 2 })
        .unwrap();
    let err = sale
        .store_exec(&alice, PRICE, StoreExecuteMsg::MintWithPass { amount: 1 })
        .unwrap_err();
    assert!(matches!(err, StoreError::NotEnoughPass { .. }));

    // Bob has no pass but an authorization for 3 units
    let store_env = sale.env_for(&sale.store_addr);
    let signature = sign_pass_req(&sale.signer, "DropStore", &store_env, &bob, 3);
    sale.store_exec(
        &bob,
        PRICE * 3,
        StoreExecuteMsg::MintWithAuthorization {
            amount: 3,
            quota: 3,
            signature_hex: signature,
        },
    )
    .unwrap();

    assert_eq!(sale.collectible_balance(&vault), 1);
    assert_eq!(sale.collectible_balance(&alice), 6);
    assert_eq!(sale.collectible_balance(&bob), 3);

    // ── Public ──
    sale.enter_public();
    sale.store_exec(
        &owner,
        0,
        StoreExecuteMsg::PreMint {
            receiver: vault.to_string(),
        },
    )
    .unwrap();

    // 40 - 2 pre-minted - 9 allowlist = 29 units for 60 tickets
    for (i, buyer) in buyers.iter().enumerate() {
        let amount = [7u64, 20, 3, 18, 12][i];
        sale.take_tickets(buyer, amount);
    }
    let inventory: InventoryState = sale.store_query(StoreQueryMsg::Inventory {});
    assert_eq!(inventory.total_tickets, 60);
    assert_eq!(inventory.pre_minted, 2);
    assert_eq!(inventory.allowlist_minted, 9);

    // Ticket ranges tile [0, total)
    let mut next = 0u64;
    for buyer in &buyers {
        let record: TicketRecord = sale.store_query(StoreQueryMsg::TicketsOf {
            address: buyer.to_string(),
        });
        assert_eq!(record.start_index, next);
        next += record.amount;
    }
    assert_eq!(next, 60);

    // ── Closed ──
    sale.enter_closed();
    let err = sale
        .store_exec(
            &owner,
            0,
            StoreExecuteMsg::PreMint {
                receiver: vault.to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::PreMintPeriodOver));

    sale.run_raffle(0xdead_beef).unwrap();
    let geometry = sale.geometry();
    assert_eq!(geometry.slot_size, 2);
    assert_eq!(geometry.last_eligible_index, 57);
    assert!(geometry.slot_offset < geometry.slot_size);

    let mut winners = 0u64;
    let mut refunded = 0u128;
    for buyer in &buyers {
        let record: TicketRecord = sale.store_query(StoreQueryMsg::TicketsOf {
            address: buyer.to_string(),
        });
        let res = sale.resolve(buyer);
        let result: ClaimResult = sale.store_query(StoreQueryMsg::ResultOf {
            address: buyer.to_string(),
        });
        assert!(result.resolved);
        let won = result.winning_tickets_remaining;
        assert_eq!(refunds(&res), PRICE * u128::from(record.amount - won));
        refunded += refunds(&res);

        assert_eq!(sale.claim_all(buyer), won);
        winners += won;
    }
    assert_eq!(winners, 29);
    assert_eq!(sale.collectible_supply(), 40);

    // Withdraw the non-refundable value
    let treasury: TreasuryResponse = sale.store_query(StoreQueryMsg::Treasury {});
    assert_eq!(treasury.withdrawable, Uint128::new(PRICE * (9 + 29)));
    let res = sale
        .store_exec(
            &owner,
            0,
            StoreExecuteMsg::Withdraw {
                receiver: vault.to_string(),
            },
        )
        .unwrap();
    assert_eq!(refunds(&res), PRICE * 38);

    let treasury: TreasuryResponse = sale.store_query(StoreQueryMsg::Treasury {});
    assert!(treasury.state.withdrawn);
    assert_eq!(treasury.withdrawable, Uint128::zero());
    assert_eq!(treasury.state.refunded, Uint128::new(refunded));
    assert_eq!(
        treasury.state.collected,
        treasury.state.withdrawn_amount + treasury.state.refunded
    );
}

#[test]
fn test_store_must_be_ledger_minter() {
    let mut sale = Sale::new(SaleParams::default());
    let owner = sale.owner.clone();
    let alice = sale.account("alice");

    // Revoke the store's minting right: the delivered mint must fail on the ledger.
    let env = sale.env_for(&sale.collectible_addr);
    drop_token_ledger::contract::execute(
        sale.collectible.as_mut(),
        env.clone(),
        message_info(&owner, &[]),
        LedgerExecute::SetMinter { minter: None },
    )
    .unwrap();

    let store_addr = sale.store_addr.clone();
    let err = drop_token_ledger::contract::execute(
        sale.collectible.as_mut(),
        env,
        message_info(&store_addr, &[]),
        LedgerExecute::Mint {
            recipient: alice.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        drop_token_ledger::ContractError::Unauthorized { .. }
    ));
}

// ═══════════════════════════════════════════════════════════════
// Raffle scenarios at full supply
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_single_holder_full_sellout() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");

    sale.enter_public();
    sale.take_tickets(&alice, 10_000);
    sale.enter_closed();
    sale.run_raffle(12_345).unwrap();

    let geometry = sale.geometry();
    assert_eq!(
        (geometry.slot_size, geometry.slot_offset, geometry.last_eligible_index),
        (1, 0, 9_999)
    );

    let res = sale.resolve(&alice);
    assert_eq!(refunds(&res), 0);
    let result: ClaimResult = sale.store_query(StoreQueryMsg::ResultOf {
        address: alice.to_string(),
    });
    assert_eq!(result.winning_tickets_remaining, 10_000);

    // One claim mints at most max_mint_per_tx
    sale.store_exec(&alice, 0, StoreExecuteMsg::ClaimWinnings {})
        .unwrap();
    assert_eq!(sale.collectible_balance(&alice), 30);
}

#[test]
fn test_allowlist_mints_shrink_raffle() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");
    let bob = sale.account("bob");

    sale.claim_passes(&alice, 1);
    sale.enter_vip();
    sale.store_exec(&alice, PRICE * 5, StoreExecuteMsg::MintWithPass { amount: 5 })
        .unwrap();

    sale.enter_public();
    sale.take_tickets(&bob, 10_000);
    sale.enter_closed();
    sale.run_raffle(7).unwrap();

    let geometry = sale.geometry();
    assert_eq!(geometry.slot_size, 1);
    assert_eq!(geometry.last_eligible_index, 9_994);

    let res = sale.resolve(&bob);
    assert_eq!(refunds(&res), PRICE * 5);
}

#[test]
fn test_double_oversubscription() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");
    let bob = sale.account("bob");

    sale.enter_public();
    sale.take_tickets(&alice, 2);
    sale.take_tickets(&bob, 19_998);
    sale.enter_closed();
    sale.run_raffle(3).unwrap();

    assert_eq!(sale.geometry().slot_size, 2);
    let valid: u64 = sale.store_query(StoreQueryMsg::CalculateValidTickets {
        start_index: 0,
        amount: 2,
    });
    assert_eq!(valid, 1);

    let res = sale.resolve(&alice);
    assert_eq!(refunds(&res), PRICE);
    let res = sale.resolve(&bob);
    assert_eq!(refunds(&res), PRICE * 9_999);
}

#[test]
fn test_one_ticket_over_supply() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");
    let bob = sale.account("bob");

    sale.enter_public();
    sale.take_tickets(&alice, 2);
    sale.take_tickets(&bob, 9_999);
    sale.enter_closed();
    sale.run_raffle(1).unwrap();

    let res = sale.resolve(&alice);
    assert_eq!(refunds(&res), 0);
    let result: ClaimResult = sale.store_query(StoreQueryMsg::ResultOf {
        address: alice.to_string(),
    });
    assert_eq!(result.winning_tickets_remaining, 2);

    // Bob's last ticket sits past the eligible prefix
    let res = sale.resolve(&bob);
    assert_eq!(refunds(&res), PRICE);
}

#[test]
fn test_raffle_runs_once_and_needs_tickets() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");

    sale.enter_closed();
    let err = sale.run_raffle(1).unwrap_err();
    assert!(matches!(err, StoreError::NoTicketsIssued));

    sale.enter_public();
    sale.take_tickets(&alice, 3);
    sale.enter_closed();
    sale.run_raffle(1).unwrap();
    let err = sale.run_raffle(2).unwrap_err();
    assert!(matches!(err, StoreError::RaffleAlreadyDrawn));
}

#[test]
fn test_authorization_is_bound_to_store_instance() {
    let mut sale = Sale::new(SaleParams::default());
    let alice = sale.account("alice");
    sale.enter_vip();

    // Signed for the pass ledger's domain instead of the store's
    let pass_env = sale.env_for(&sale.pass_addr);
    let signature = sign_pass_req(&sale.signer, "DropStore", &pass_env, &alice, 2);
    let err = sale
        .store_exec(
            &alice,
            PRICE,
            StoreExecuteMsg::MintWithAuthorization {
                amount: 1,
                quota: 2,
                signature_hex: signature,
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::SignatureNotFromOwner));
}
