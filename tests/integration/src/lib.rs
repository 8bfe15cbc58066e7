//! End-to-end tests for vaultguard.
//!
//! Each test builds a [`Vault`](vaultguard_vault::Vault) with a recording
//! executor and an in-memory audit log, then drives it the way an asset
//! manager and an owner would.
//!
//! ```bash
//! cargo test -p vaultguard-integration-tests
//! ```

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, Address, Selector, B256, U256};
    use alloy::sol_types::SolCall;
    use tempfile::TempDir;
    use vaultguard_core::audit::MemoryAuditLog;
    use vaultguard_core::{DenyReason, ProtocolFamily, ReasonCode};
    use vaultguard_evm::abi::{
        IExchangeAccount, ILendingPool, IRebalanceRelay, IUniswapV2Router, IV3SwapRouter, IERC20,
        IERC7540,
    };
    use vaultguard_evm::path::encode_packed_path;
    use vaultguard_evm::Gate;
    use vaultguard_vault::{RecordingExecutor, Vault, VaultError};

    const OWNER: Address = address!("00000000000000000000000000000000000000a1");
    const MANAGER: Address = address!("00000000000000000000000000000000000000b2");
    const ACCOUNT: Address = address!("00000000000000000000000000000000000000c3");
    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const SCAM: Address = address!("5CA3000000000000000000000000000000005CA3");
    const ROUTER_X: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
    const V3_ROUTER: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");
    const POOL: Address = address!("87870Bca3F3fD6335C3F4ce8392D69350B4fA4E2");
    const UNLISTED: Address = address!("000000000000000000000000000000000000dEaD");
    const RELAY: Address = address!("0000000000000000000000000000000000000e01");
    const EXCHANGE: Address = address!("0000000000000000000000000000000000000e02");
    const ASYNC_VAULT: Address = address!("0000000000000000000000000000000000000e03");

    const SWAP: Selector = Selector::new(IUniswapV2Router::swapExactTokensForTokensCall::SELECTOR);

    /// Manager enabled, `(ROUTER_X, swap)` whitelisted, tokens {USDC, WETH},
    /// ROUTER_X not in the router list.
    fn scenario_vault() -> (Vault<RecordingExecutor>, MemoryAuditLog) {
        let log = MemoryAuditLog::new();
        let mut vault = Vault::new(ACCOUNT, OWNER, RecordingExecutor::new()).with_audit(log.clone());
        vault.add_target_selector(OWNER, ROUTER_X, SWAP).unwrap();
        vault.add_token(OWNER, USDC).unwrap();
        vault.add_token(OWNER, WETH).unwrap();
        vault.set_asset_manager(OWNER, Some(MANAGER)).unwrap();
        (vault, log)
    }

    fn swap(path: Vec<Address>, to: Address) -> Vec<u8> {
        IUniswapV2Router::swapExactTokensForTokensCall {
            amountIn: U256::from(1_000_000u64),
            amountOutMin: U256::from(1u64),
            path,
            to,
            deadline: U256::from(1_900_000_000u64),
        }
        .abi_encode()
    }

    fn deny_code(result: Result<vaultguard_vault::CallOutcome, VaultError>) -> ReasonCode {
        match result {
            Err(VaultError::Denied(reason)) => reason.code(),
            Err(other) => panic!("expected a denial, got {other}"),
            Ok(outcome) => panic!("expected a denial, got allowed {:?}", outcome.intent),
        }
    }

    fn rebalance(action: u8) -> Vec<u8> {
        IRebalanceRelay::rebalanceCall {
            message: IRebalanceRelay::RebalanceMessage {
                rebalanceId: U256::from(9u64),
                action,
                token: USDC,
                amount: 250_000u128,
                srcChainId: U256::from(1u64),
                dstChainId: U256::from(42161u64),
            },
        }
        .abi_encode()
    }

    fn exchange_withdraw() -> Vec<u8> {
        IExchangeAccount::withdrawCall {
            data: IExchangeAccount::AccountWithdraw {
                accountId: B256::repeat_byte(0xaa),
                brokerHash: B256::repeat_byte(0xbb),
                tokenHash: B256::repeat_byte(0xcc),
                amount: 1_000u128,
            },
        }
        .abi_encode()
    }

    fn request_deposit(controller: Address) -> Vec<u8> {
        IERC7540::requestDepositCall {
            assets: U256::from(5_000u64),
            controller,
            owner: ACCOUNT,
        }
        .abi_encode()
    }

    // ---- scenarios ----

    #[test]
    fn scenario_a_whitelisted_swap_to_owner_allowed() {
        let (mut vault, log) = scenario_vault();
        let outcome = vault
            .propose_call(MANAGER, ROUTER_X, &swap(vec![USDC, WETH], OWNER))
            .unwrap();
        assert_eq!(outcome.gate, Gate::TargetSelector);
        assert_eq!(outcome.intent.tokens, vec![USDC, WETH]);
        assert_eq!(outcome.intent.recipient, Some(OWNER));
        assert_eq!(vault.executor().calls().len(), 1);
        assert_eq!(log.events_of("call_decision")[0].outcome, "allowed");
    }

    #[test]
    fn scenario_b_unlisted_output_token_denied() {
        let (mut vault, _) = scenario_vault();
        let result = vault.propose_call(MANAGER, ROUTER_X, &swap(vec![USDC, SCAM], OWNER));
        assert!(matches!(
            result,
            Err(VaultError::Denied(DenyReason::TokenNotWhitelisted { token })) if token == SCAM
        ));
        assert!(vault.executor().calls().is_empty());
    }

    #[test]
    fn scenario_c_recipient_is_manager_denied() {
        let (mut vault, _) = scenario_vault();
        let result = vault.propose_call(MANAGER, ROUTER_X, &swap(vec![USDC, WETH], MANAGER));
        assert!(matches!(
            result,
            Err(VaultError::Denied(DenyReason::RecipientNotOwner { recipient })) if recipient == MANAGER
        ));
        assert!(vault.executor().calls().is_empty());
    }

    #[test]
    fn scenario_d_unlisted_target_denied_regardless_of_decodability() {
        let (mut vault, _) = scenario_vault();
        let decodable = swap(vec![USDC, WETH], OWNER);
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, UNLISTED, &decodable)),
            ReasonCode::TargetNotWhitelisted
        );
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, UNLISTED, &[0xff; 37])),
            ReasonCode::TargetNotWhitelisted
        );
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, UNLISTED, &[])),
            ReasonCode::TargetNotWhitelisted
        );
        // Whitelisted target, selector not paired with it.
        let transfer = IERC20::transferCall {
            to: OWNER,
            amount: U256::from(1u64),
        }
        .abi_encode();
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, ROUTER_X, &transfer)),
            ReasonCode::TargetNotWhitelisted
        );
        assert!(vault.executor().calls().is_empty());
    }

    #[test]
    fn scenario_e_owner_withdraw() {
        let (mut vault, log) = scenario_vault();
        let outcome = vault
            .owner_withdraw(OWNER, USDC, U256::from(500u64))
            .unwrap();
        assert_eq!(outcome.intent.tokens, vec![USDC]);
        assert_eq!(vault.executor().calls()[0].0, USDC);

        let result = vault.owner_withdraw(OWNER, SCAM, U256::from(500u64));
        assert!(matches!(
            result,
            Err(VaultError::Denied(DenyReason::TokenNotWhitelisted { token })) if token == SCAM
        ));
        assert_eq!(vault.executor().calls().len(), 1);

        let outcomes: Vec<_> = log
            .events_of("owner_withdraw")
            .into_iter()
            .map(|e| e.outcome)
            .collect();
        assert_eq!(outcomes, vec!["allowed", "token_not_whitelisted"]);
    }

    #[test]
    fn scenario_f_multi_hop_with_unlisted_intermediate_denied() {
        let (mut vault, _) = scenario_vault();
        vault.add_token(OWNER, DAI).unwrap();
        vault
            .add_router(OWNER, V3_ROUTER, ProtocolFamily::PathSwap)
            .unwrap();

        let packed = IV3SwapRouter::exactInputCall {
            params: IV3SwapRouter::ExactInputParams {
                path: encode_packed_path(&[USDC, WETH, SCAM, DAI], &[500, 3000, 10000]).into(),
                recipient: OWNER,
                amountIn: U256::from(1_000_000u64),
                amountOutMinimum: U256::from(1u64),
            },
        }
        .abi_encode();
        let result = vault.propose_call(MANAGER, V3_ROUTER, &packed);
        assert!(matches!(
            result,
            Err(VaultError::Denied(DenyReason::TokenNotWhitelisted { token })) if token == SCAM
        ));

        let array_path = swap(vec![USDC, WETH, SCAM, DAI], OWNER);
        let result = vault.propose_call(MANAGER, ROUTER_X, &array_path);
        assert!(matches!(
            result,
            Err(VaultError::Denied(DenyReason::TokenNotWhitelisted { token })) if token == SCAM
        ));

        // The same route without the intermediate passes.
        let clean = IV3SwapRouter::exactInputCall {
            params: IV3SwapRouter::ExactInputParams {
                path: encode_packed_path(&[USDC, WETH, DAI], &[500, 3000]).into(),
                recipient: OWNER,
                amountIn: U256::from(1_000_000u64),
                amountOutMinimum: U256::from(1u64),
            },
        }
        .abi_encode();
        let outcome = vault.propose_call(MANAGER, V3_ROUTER, &clean).unwrap();
        assert_eq!(outcome.gate, Gate::Router(ProtocolFamily::PathSwap));
        assert_eq!(outcome.intent.tokens, vec![USDC, WETH, DAI]);
    }

    // ---- properties ----

    #[test]
    fn any_unlisted_token_in_the_intent_denies() {
        let route = vec![USDC, WETH, DAI];
        for missing in &route {
            let (mut vault, _) = scenario_vault();
            vault.add_token(OWNER, DAI).unwrap();
            vault.remove_token(OWNER, *missing).unwrap();
            let result = vault.propose_call(MANAGER, ROUTER_X, &swap(route.clone(), OWNER));
            assert!(
                matches!(
                    result,
                    Err(VaultError::Denied(DenyReason::TokenNotWhitelisted { token })) if token == *missing
                ),
                "route with {missing} unlisted was not denied"
            );
        }
    }

    #[test]
    fn any_recipient_other_than_owner_denies() {
        let (mut vault, _) = scenario_vault();
        for byte in 0u8..=255 {
            let recipient = Address::repeat_byte(byte);
            if recipient == OWNER {
                continue;
            }
            let result = vault.propose_call(MANAGER, ROUTER_X, &swap(vec![USDC, WETH], recipient));
            assert_eq!(deny_code(result), ReasonCode::RecipientNotOwner);
        }
        for recipient in [MANAGER, ACCOUNT, ROUTER_X, Address::ZERO] {
            let result = vault.propose_call(MANAGER, ROUTER_X, &swap(vec![USDC, WETH], recipient));
            assert_eq!(deny_code(result), ReasonCode::RecipientNotOwner);
        }
        assert!(vault.executor().calls().is_empty());
    }

    #[test]
    fn lending_withdraw_to_manager_denied() {
        let (mut vault, _) = scenario_vault();
        vault
            .add_router(OWNER, POOL, ProtocolFamily::Lending)
            .unwrap();
        let withdraw = |to| {
            ILendingPool::withdrawCall {
                asset: USDC,
                amount: U256::MAX,
                to,
            }
            .abi_encode()
        };
        assert!(vault.propose_call(MANAGER, POOL, &withdraw(OWNER)).is_ok());
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, POOL, &withdraw(MANAGER))),
            ReasonCode::RecipientNotOwner
        );
    }

    #[test]
    fn repeated_adds_are_idempotent() {
        let (mut vault, log) = scenario_vault();
        let before = vault.store().snapshot();
        for _ in 0..3 {
            assert!(!vault.add_token(OWNER, USDC).unwrap().changed());
            assert!(!vault
                .add_target_selector(OWNER, ROUTER_X, SWAP)
                .unwrap()
                .changed());
        }
        assert_eq!(vault.store().snapshot(), before);
        assert!(log
            .events_of("whitelist_change")
            .iter()
            .rev()
            .take(6)
            .all(|e| e.outcome == "unchanged"));
    }

    #[test]
    fn add_then_remove_round_trips() {
        let (mut vault, _) = scenario_vault();
        vault.add_token(OWNER, DAI).unwrap();
        vault.remove_token(OWNER, DAI).unwrap();
        assert!(!vault.store().is_token_allowed(DAI));

        let selector = Selector::new(IERC20::approveCall::SELECTOR);
        let ops = [true, false, true, true, false, true];
        for add in ops {
            if add {
                vault.add_target_selector(OWNER, DAI, selector).unwrap();
            } else {
                vault.remove_target_selector(OWNER, DAI, selector).unwrap();
            }
            assert_eq!(vault.store().is_target_selector_allowed(DAI, selector), add);
        }
        assert!(vault.remove_target_selector(OWNER, DAI, selector).unwrap().changed());
        assert!(!vault.remove_target_selector(OWNER, DAI, selector).unwrap().changed());
    }

    #[test]
    fn removed_pair_stops_authorizing() {
        let (mut vault, _) = scenario_vault();
        let data = swap(vec![USDC, WETH], OWNER);
        assert!(vault.propose_call(MANAGER, ROUTER_X, &data).is_ok());
        vault.remove_target_selector(OWNER, ROUTER_X, SWAP).unwrap();
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, ROUTER_X, &data)),
            ReasonCode::TargetNotWhitelisted
        );
    }

    // ---- router families ----

    #[test]
    fn relay_rebalance_with_unknown_action_is_not_executed() {
        let (mut vault, log) = scenario_vault();
        vault
            .add_router(OWNER, RELAY, ProtocolFamily::RebalanceRelay)
            .unwrap();

        let outcome = vault.propose_call(MANAGER, RELAY, &rebalance(1)).unwrap();
        assert_eq!(outcome.gate, Gate::Router(ProtocolFamily::RebalanceRelay));
        assert_eq!(vault.executor().calls().len(), 1);

        assert_eq!(
            deny_code(vault.propose_call(MANAGER, RELAY, &rebalance(7))),
            ReasonCode::UndecodableCall
        );
        assert_eq!(vault.executor().calls().len(), 1);
        let decisions = log.events_of("call_decision");
        assert_eq!(decisions.last().unwrap().outcome, "undecodable_call");
    }

    #[test]
    fn exchange_account_withdraw_needs_no_tokens() {
        let (mut vault, _) = scenario_vault();
        vault
            .add_router(OWNER, EXCHANGE, ProtocolFamily::ExchangeAccount)
            .unwrap();
        let outcome = vault
            .propose_call(MANAGER, EXCHANGE, &exchange_withdraw())
            .unwrap();
        assert_eq!(outcome.gate, Gate::Router(ProtocolFamily::ExchangeAccount));
        assert!(outcome.intent.tokens.is_empty());
        assert!(outcome.intent.recipient.is_none());
        assert_eq!(vault.executor().calls()[0].0, EXCHANGE);
    }

    #[test]
    fn request_deposit_for_foreign_controller_is_not_executed() {
        let (mut vault, _) = scenario_vault();
        vault.add_token(OWNER, ASYNC_VAULT).unwrap();
        vault
            .add_router(OWNER, ASYNC_VAULT, ProtocolFamily::TokenizedVault)
            .unwrap();

        assert!(vault
            .propose_call(MANAGER, ASYNC_VAULT, &request_deposit(ACCOUNT))
            .is_ok());
        assert!(matches!(
            vault.propose_call(MANAGER, ASYNC_VAULT, &request_deposit(MANAGER)),
            Err(VaultError::Denied(DenyReason::RecipientNotOwner { recipient })) if recipient == MANAGER
        ));
        assert_eq!(vault.executor().calls().len(), 1);
    }

    #[test]
    fn lending_supply_on_behalf_of_manager_is_not_executed() {
        let (mut vault, _) = scenario_vault();
        vault.add_router(OWNER, POOL, ProtocolFamily::Lending).unwrap();
        let supply = |on_behalf_of| {
            ILendingPool::supplyCall {
                asset: USDC,
                amount: U256::from(1_000u64),
                onBehalfOf: on_behalf_of,
                referralCode: 0,
            }
            .abi_encode()
        };

        assert!(vault.propose_call(MANAGER, POOL, &supply(ACCOUNT)).is_ok());
        assert_eq!(
            deny_code(vault.propose_call(MANAGER, POOL, &supply(MANAGER))),
            ReasonCode::RecipientNotOwner
        );
        assert_eq!(vault.executor().calls().len(), 1);
    }

    // ---- config file ----

    #[test]
    fn vault_loaded_from_yaml_writes_jsonl_audit() {
        let dir = TempDir::new().unwrap();
        let audit_path = dir.path().join("audit.jsonl");
        let config_path = dir.path().join("guard.yaml");
        std::fs::write(
            &config_path,
            format!(
                r#"
owner: "{OWNER}"
account: "{ACCOUNT}"
asset_manager: "{MANAGER}"
tokens: ["{USDC}", "{ASYNC_VAULT}"]
routers:
  - address: "{RELAY}"
    family: rebalance_relay
  - address: "{EXCHANGE}"
    family: exchange_account
  - address: "{ASYNC_VAULT}"
    family: tokenized_vault
audit_log: "{}"
"#,
                audit_path.display()
            ),
        )
        .unwrap();

        let mut vault = Vault::load(&config_path, RecordingExecutor::new()).unwrap();
        let _ = vault.propose_call(MANAGER, RELAY, &rebalance(0));
        let _ = vault.propose_call(MANAGER, RELAY, &rebalance(7));
        let _ = vault.propose_call(MANAGER, EXCHANGE, &exchange_withdraw());
        let _ = vault.propose_call(MANAGER, ASYNC_VAULT, &request_deposit(ACCOUNT));
        let _ = vault.propose_call(MANAGER, ASYNC_VAULT, &request_deposit(MANAGER));
        assert_eq!(vault.executor().calls().len(), 3);

        let contents = std::fs::read_to_string(&audit_path).unwrap();
        let events: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let outcomes: Vec<&str> = events
            .iter()
            .map(|e| e["outcome"].as_str().unwrap())
            .collect();
        assert_eq!(
            outcomes,
            vec![
                "allowed",
                "undecodable_call",
                "allowed",
                "allowed",
                "recipient_not_owner"
            ]
        );
        assert!(events.iter().all(|e| e["event_type"] == "call_decision"));
        assert_eq!(events[0]["details"]["router_family"], "rebalance_relay");
        assert_eq!(events[0]["details"]["intent"]["metadata"]["action"], "burn");
        assert_eq!(events[2]["details"]["gate"], "router");
        assert_eq!(events[2]["details"]["intent"]["tokens"], serde_json::json!([]));
        assert_eq!(events[4]["details"]["decision"], "denied");
    }
}
