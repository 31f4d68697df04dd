//! Solana implementation for DevKit Wallet
//!
//! [`SolanaRpc`] implements the wallet's [`ChainRpc`] collaborator over the
//! non-blocking JSON-RPC client at `confirmed` commitment.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::program_pack::Pack;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction as associated_token_instruction,
};
use spl_token::{instruction as token_instruction, state::Mint};
use tracing::{debug, info, warn};

use devkit_wallet::account::WalletAccount;
use devkit_wallet::error::{Error, Result};
use devkit_wallet::rpc::{ChainRpc, MintedToken, TokenSpec};
use devkit_wallet::{Chain, WalletConfig};

/// Solana JSON-RPC client
pub struct SolanaRpc {
    client: Arc<RpcClient>,
}

impl SolanaRpc {
    /// Create a client for `url` at `confirmed` commitment
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            url.into(),
            timeout,
            CommitmentConfig::confirmed(),
        );

        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(config.rpc_url.clone(), config.rpc_timeout)
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> String {
        self.client.url()
    }

    async fn sign_and_send(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| rpc_error("Failed to get recent blockhash", e))?;

        let transaction = {
            let mut signers: Vec<&dyn Signer> = vec![payer];
            signers.extend(extra_signers.iter().map(|k| *k as &dyn Signer));
            Transaction::new_signed_with_payer(
                instructions,
                Some(&payer.pubkey()),
                &signers,
                blockhash,
            )
        };

        self.client
            .send_transaction(&transaction)
            .await
            .map_err(|e| rpc_error("Failed to send transaction", e))
    }
}

#[async_trait]
impl ChainRpc for SolanaRpc {
    async fn get_balance(&self, address: &str) -> Result<u64> {
        let pubkey = parse_pubkey(address)?;
        self.client
            .get_balance(&pubkey)
            .await
            .map_err(|e| rpc_error("Failed to get balance", e))
    }

    async fn request_airdrop(&self, address: &str, lamports: u64) -> Result<String> {
        let pubkey = parse_pubkey(address)?;
        let signature = self
            .client
            .request_airdrop(&pubkey, lamports)
            .await
            .map_err(|e| airdrop_error(e.to_string()))?;

        debug!(%address, lamports, %signature, "airdrop requested");
        Ok(signature.to_string())
    }

    async fn confirm_transaction(&self, signature: &str) -> Result<()> {
        let signature = Signature::from_str(signature)
            .map_err(|e| Error::InvalidInput(format!("Invalid transaction signature: {}", e)))?;

        self.client
            .poll_for_signature(&signature)
            .await
            .map_err(|e| rpc_error("Transaction was not confirmed", e))
    }

    async fn transfer(&self, from: &WalletAccount, to: &str, lamports: u64) -> Result<String> {
        let payer = signer_keypair(from)?;
        let to_pubkey = parse_pubkey(to)?;

        let instruction = system_instruction::transfer(&payer.pubkey(), &to_pubkey, lamports);
        let signature = self.sign_and_send(&[instruction], &payer, &[]).await?;

        info!(from = %payer.pubkey(), %to, lamports, %signature, "transfer sent");
        Ok(signature.to_string())
    }

    async fn create_token(&self, owner: &WalletAccount, token: &TokenSpec) -> Result<MintedToken> {
        let payer = signer_keypair(owner)?;
        let raw_supply = token.raw_supply()?;
        let mint = Keypair::new();

        let rent = self
            .client
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await
            .map_err(|e| rpc_error("Failed to get rent exemption", e))?;

        let instructions =
            mint_instructions(&payer.pubkey(), &mint.pubkey(), rent, token, raw_supply)?;
        let token_account = get_associated_token_address(&payer.pubkey(), &mint.pubkey());
        let signature = self.sign_and_send(&instructions, &payer, &[&mint]).await?;

        info!(
            mint = %mint.pubkey(),
            name = %token.name,
            symbol = %token.symbol,
            uri = %token.uri,
            "mint created"
        );
        Ok(MintedToken {
            mint: mint.pubkey().to_string(),
            token_account: token_account.to_string(),
            signature: signature.to_string(),
        })
    }
}

/// Instructions creating a mint, the owner's token account, and the initial supply
fn mint_instructions(
    owner: &Pubkey,
    mint: &Pubkey,
    rent: u64,
    token: &TokenSpec,
    raw_supply: u64,
) -> Result<Vec<Instruction>> {
    let freeze_authority = token.freezable.then_some(owner);
    let token_account = get_associated_token_address(owner, mint);

    let create_mint =
        system_instruction::create_account(owner, mint, rent, Mint::LEN as u64, &spl_token::id());

    let initialize_mint = token_instruction::initialize_mint(
        &spl_token::id(),
        mint,
        owner,
        freeze_authority,
        token.decimals,
    )
    .map_err(|e| Error::Rpc(format!("Failed to build initialize mint instruction: {}", e)))?;

    let create_token_account = associated_token_instruction::create_associated_token_account(
        owner,
        owner,
        mint,
        &spl_token::id(),
    );

    let mint_supply =
        token_instruction::mint_to(&spl_token::id(), mint, &token_account, owner, &[], raw_supply)
            .map_err(|e| Error::Rpc(format!("Failed to build mint instruction: {}", e)))?;

    Ok(vec![create_mint, initialize_mint, create_token_account, mint_supply])
}

/// Rebuild the keypair of a derived Solana account
fn signer_keypair(account: &WalletAccount) -> Result<Keypair> {
    if account.chain() != Chain::Solana {
        return Err(Error::InvalidInput(format!(
            "{} accounts cannot sign Solana transactions",
            account.chain()
        )));
    }

    let bytes = bs58::decode(account.private_key())
        .into_vec()
        .map_err(|e| Error::InvalidInput(format!("Invalid private key: {}", e)))?;

    Keypair::from_bytes(&bytes)
        .map_err(|e| Error::InvalidInput(format!("Invalid private key: {}", e)))
}

fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address)
        .map_err(|e| Error::InvalidInput(format!("Invalid Solana address {}: {}", address, e)))
}

fn rpc_error(context: &str, e: ClientError) -> Error {
    Error::Rpc(format!("{}: {}", context, e))
}

fn airdrop_error(message: String) -> Error {
    if message.contains("429") {
        warn!(%message, "airdrop rate limited");
        return Error::Rpc(format!("Airdrop rate limited: {}", message));
    }
    Error::Rpc(format!("Airdrop failed: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use devkit_wallet::crypto::keys::derive_account;
    use devkit_wallet::crypto::mnemonic::{mnemonic_to_seed, split_phrase};
    use solana_program::program_option::COption;
    use spl_token::instruction::TokenInstruction;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn account(chain: Chain, index: u32) -> WalletAccount {
        let seed = mnemonic_to_seed(&split_phrase(ABANDON), None).unwrap();
        derive_account(seed.as_bytes(), chain, index).unwrap()
    }

    #[test]
    fn test_signer_keypair_matches_address() {
        let account = account(Chain::Solana, 2);
        let keypair = signer_keypair(&account).unwrap();
        assert_eq!(keypair.pubkey().to_string(), account.public_key());
    }

    #[test]
    fn test_ethereum_account_is_not_a_signer() {
        let account = account(Chain::Ethereum, 0);
        assert!(matches!(signer_keypair(&account), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_pubkey() {
        assert!(parse_pubkey("11111111111111111111111111111111").is_ok());
        assert!(parse_pubkey("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").is_err());
    }

    #[test]
    fn test_airdrop_rate_limit_message() {
        let message = "HTTP status client error (429 Too Many Requests) for url";
        let error = airdrop_error(message.to_string());
        match error {
            Error::Rpc(message) => {
                assert!(message.starts_with("Airdrop rate limited"));
                assert!(message.contains("429 Too Many Requests"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mint_instructions() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut token = TokenSpec::new("Dev Token", "DEV", "https://example.com/dev.json", 10);
        token.freezable = true;

        let raw_supply = token.raw_supply().unwrap();
        let instructions = mint_instructions(&owner, &mint, 1_461_600, &token, raw_supply).unwrap();
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[1].program_id, spl_token::id());
        assert_eq!(instructions[2].program_id, spl_associated_token_account::id());

        match TokenInstruction::unpack(&instructions[1].data).unwrap() {
            TokenInstruction::InitializeMint { decimals, mint_authority, freeze_authority } => {
                assert_eq!(decimals, 6);
                assert_eq!(mint_authority, owner);
                assert_eq!(freeze_authority, COption::Some(owner));
            }
            _ => panic!("expected InitializeMint"),
        }
        match TokenInstruction::unpack(&instructions[3].data).unwrap() {
            TokenInstruction::MintTo { amount } => assert_eq!(amount, 10_000_000),
            _ => panic!("expected MintTo"),
        }
        assert_eq!(Mint::LEN, 82);
    }

    #[test]
    fn test_from_config() {
        let config = WalletConfig {
            rpc_url: "http://127.0.0.1:8899".to_string(),
            ..WalletConfig::default()
        };
        let rpc = SolanaRpc::from_config(&config);
        assert_eq!(rpc.url(), "http://127.0.0.1:8899");
    }
}
