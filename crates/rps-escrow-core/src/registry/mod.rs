//! Game registry: record lifecycle, judging, and settlement.

mod record;

pub use record::{Game, GameId, GameStatus, Outcome};

use crate::address::Address;
use crate::crypto::{Commitment, Secret};
use crate::error::GameError;
use crate::game::{Hand, RoundResult};
use crate::ledger::Ledger;

/// Fixed tag carried by the unsolicited-transfer notification event
pub const RECEIVE_TAG: &str = "receive";

/// Copied-out fields of an in-progress record, taken before settlement
/// mutates the registry.
struct JudgeContext {
    commitment: Commitment,
    player: Address,
    player_hand: Hand,
}

/// The append-only game registry.
///
/// Owns every record and the global fee; the only writer of state
/// transitions. Operations are atomic read-modify-writes: all validation
/// happens before any record mutation or fund movement, so a failed
/// operation leaves registry and ledger untouched. Exclusive access
/// (`&mut self`) is the serialization contract; callers running concurrent
/// requests put the registry behind a lock.
pub struct Registry<L: Ledger> {
    owner: Address,
    participation_fee: u64,
    games: Vec<Game>,
    ledger: L,
}

impl<L: Ledger> Registry<L> {
    /// Create a registry with its designated owner and initial fee
    pub fn new(owner: Address, participation_fee: u64, ledger: L) -> Self {
        Self {
            owner,
            participation_fee,
            games: Vec::new(),
            ledger,
        }
    }

    /// The owner identity allowed through restricted entry points
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The fee required of newly initialized games
    pub fn participation_fee(&self) -> u64 {
        self.participation_fee
    }

    /// Identifier the next initialized game will receive
    pub fn next_game_id(&self) -> GameId {
        GameId::new(self.games.len() as u64)
    }

    /// Look up a record; `None` for identifiers never created
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id.index())
    }

    /// The ledger backing this registry's escrow
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Create a new game: publish the commitment and escrow the deposit.
    ///
    /// Owner only. The deposit must cover the current participation fee
    /// and becomes the game's stake, which a joiner must later match
    /// exactly even if the fee changes in between.
    pub fn initialize(
        &mut self,
        caller: &Address,
        commitment: Commitment,
        deposit: u64,
    ) -> Result<GameId, GameError> {
        self.require_owner(caller)?;
        if deposit < self.participation_fee {
            return Err(GameError::DepositBelowFee {
                fee: self.participation_fee,
                deposited: deposit,
            });
        }

        self.ledger.collect(caller, deposit)?;
        let id = self.next_game_id();
        self.games.push(Game::new(id, commitment, deposit));

        tracing::info!(game = %id, stake = deposit, "game initialized");
        Ok(id)
    }

    /// Join an initialized game with a clear-text hand and a matching stake.
    ///
    /// Open to anyone but the owner. The target must exist and still be
    /// joinable; both failures surface as `invalid game ID` on purpose.
    pub fn join(
        &mut self,
        caller: &Address,
        id: GameId,
        hand: Hand,
        deposit: u64,
    ) -> Result<(), GameError> {
        let stake = match self.game(id) {
            Some(game) if game.status == GameStatus::Initialized => game.stake,
            _ => return Err(GameError::InvalidGameId(id)),
        };
        if caller == &self.owner {
            return Err(GameError::CannotPlayAlone);
        }
        if deposit != stake {
            return Err(GameError::DepositMismatch {
                stake,
                deposited: deposit,
            });
        }

        self.ledger.collect(caller, deposit)?;
        let game = &mut self.games[id.index()];
        game.player = Some(*caller);
        game.player_hand = Some(hand);
        game.status = GameStatus::InProgress;

        tracing::info!(game = %id, player = %caller, "player joined");
        Ok(())
    }

    /// Withdraw a game nobody has joined yet and refund the stake.
    ///
    /// Owner only. Once a player has joined, the game must be judged; it
    /// can no longer be unilaterally withdrawn.
    pub fn cancel(&mut self, caller: &Address, id: GameId) -> Result<(), GameError> {
        self.require_owner(caller)?;
        match self.game(id) {
            Some(game) if game.status == GameStatus::Initialized => {}
            _ => return Err(GameError::CannotCancel),
        }

        let game = &mut self.games[id.index()];
        game.status = GameStatus::Completed;
        game.outcome = Some(Outcome::NoWinner);
        let stake = game.stake;

        // The record is finalized before any funds move.
        self.ledger.release(&self.owner, stake)?;

        tracing::info!(game = %id, "game cancelled");
        Ok(())
    }

    /// Blind reveal: recover the owner's hand from the secret alone,
    /// then settle.
    ///
    /// Callable by the game's owner or its joined player, so the player
    /// can force settlement once it holds the secret.
    pub fn judge(
        &mut self,
        caller: &Address,
        id: GameId,
        secret: &Secret,
    ) -> Result<Outcome, GameError> {
        let duel = self.judgeable(caller, id)?;
        let owner_hand = duel
            .commitment
            .reveal(&self.owner, secret)
            .ok_or(GameError::WrongCommitment)?;
        self.settle(id, duel, owner_hand)
    }

    /// Hand-asserted reveal: verify the claimed hand against the
    /// commitment, then settle.
    pub fn judge_with_hand(
        &mut self,
        caller: &Address,
        id: GameId,
        hand: Hand,
        secret: &Secret,
    ) -> Result<Outcome, GameError> {
        let duel = self.judgeable(caller, id)?;
        if !duel.commitment.matches(&self.owner, hand, secret) {
            return Err(GameError::HandMismatch);
        }
        self.settle(id, duel, hand)
    }

    /// Overwrite the participation fee for games initialized from now on.
    ///
    /// Owner only, no bounds check. In-flight games keep their captured
    /// stake.
    pub fn configure_fee(&mut self, caller: &Address, new_fee: u64) -> Result<(), GameError> {
        self.require_owner(caller)?;
        self.participation_fee = new_fee;
        tracing::info!(fee = new_fee, "participation fee configured");
        Ok(())
    }

    /// Accept an unsolicited transfer into the vault.
    ///
    /// Touches no game record; emits the notification event with the
    /// fixed tag for off-process observers.
    pub fn receive(&self, from: &Address, amount: u64) -> Result<(), GameError> {
        self.ledger.collect(from, amount)?;
        tracing::info!(from = %from, amount, "{}", RECEIVE_TAG);
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), GameError> {
        if caller != &self.owner {
            return Err(GameError::NotOwner);
        }
        Ok(())
    }

    /// Gate shared by both judge variants: status first, then caller.
    fn judgeable(&self, caller: &Address, id: GameId) -> Result<JudgeContext, GameError> {
        let game = match self.game(id) {
            Some(game) if game.status == GameStatus::InProgress => game,
            _ => return Err(GameError::InvalidGameStatus),
        };
        if caller != &self.owner && game.player != Some(*caller) {
            return Err(GameError::InvalidJudger);
        }

        // An in-progress record always carries both; `join` is the only
        // writer of the InProgress transition.
        let player = game.player.expect("in-progress game has a player");
        let player_hand = game
            .player_hand
            .expect("in-progress game has a player hand");

        Ok(JudgeContext {
            commitment: game.commitment,
            player,
            player_hand,
        })
    }

    /// Finalize the record, then disburse the pot.
    fn settle(
        &mut self,
        id: GameId,
        duel: JudgeContext,
        owner_hand: Hand,
    ) -> Result<Outcome, GameError> {
        let outcome = match owner_hand.against(&duel.player_hand) {
            RoundResult::Win => Outcome::Winner(self.owner),
            RoundResult::Lose => Outcome::Winner(duel.player),
            RoundResult::Draw => Outcome::NoWinner,
        };

        let game = &mut self.games[id.index()];
        game.status = GameStatus::Completed;
        game.outcome = Some(outcome);
        let stake = game.stake;

        // Completed status and outcome are recorded before funds move, so
        // no caller re-entering through the ledger can observe this game
        // as still in progress.
        match outcome {
            Outcome::Winner(winner) => self.ledger.release(&winner, 2 * stake)?,
            Outcome::NoWinner => {
                self.ledger.release(&self.owner, stake)?;
                self.ledger.release(&duel.player, stake)?;
            }
        }

        tracing::info!(game = %id, outcome = ?outcome, "game settled");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const FEE: u64 = 100;

    fn setup() -> (Registry<InMemoryLedger>, InMemoryLedger, Address, Address) {
        let ledger = InMemoryLedger::new();
        let owner = Address::random();
        let player = Address::random();
        ledger.fund(&owner, 10 * FEE);
        ledger.fund(&player, 10 * FEE);
        let registry = Registry::new(owner, FEE, ledger.clone());
        (registry, ledger, owner, player)
    }

    fn commit(owner: &Address, hand: Hand) -> (Commitment, Secret) {
        let secret = Secret::random();
        (Commitment::bind(owner, hand, &secret), secret)
    }

    #[test]
    fn test_initialize_assigns_sequential_ids() {
        let (mut registry, _, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);

        let first = registry.initialize(&owner, commitment, FEE).unwrap();
        let second = registry.initialize(&owner, commitment, FEE).unwrap();

        assert_eq!(first.as_u64(), 0);
        assert_eq!(second.as_u64(), 1);
        assert_eq!(registry.next_game_id().as_u64(), 2);
    }

    #[test]
    fn test_initialize_requires_owner() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);

        let result = registry.initialize(&player, commitment, FEE);
        assert_eq!(result, Err(GameError::NotOwner));
    }

    #[test]
    fn test_initialize_rejects_deposit_below_fee() {
        let (mut registry, ledger, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);

        let result = registry.initialize(&owner, commitment, FEE / 2);
        assert_eq!(
            result,
            Err(GameError::DepositBelowFee {
                fee: FEE,
                deposited: FEE / 2,
            })
        );
        assert_eq!(ledger.escrowed(), 0);
        assert_eq!(registry.next_game_id().as_u64(), 0);
    }

    #[test]
    fn test_initialize_accepts_deposit_above_fee() {
        let (mut registry, ledger, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);

        let id = registry.initialize(&owner, commitment, 3 * FEE).unwrap();

        let game = registry.game(id).unwrap();
        assert_eq!(game.stake(), 3 * FEE);
        assert_eq!(ledger.escrowed(), 3 * FEE);
    }

    #[test]
    fn test_join_requires_exact_stake() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, 3 * FEE).unwrap();

        // The captured stake governs, not the current fee.
        let result = registry.join(&player, id, Hand::Rock, FEE);
        assert_eq!(
            result,
            Err(GameError::DepositMismatch {
                stake: 3 * FEE,
                deposited: FEE,
            })
        );

        registry.join(&player, id, Hand::Rock, 3 * FEE).unwrap();
        let game = registry.game(id).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.player(), Some(player));
        assert_eq!(game.player_hand(), Some(Hand::Rock));
    }

    #[test]
    fn test_join_unknown_id() {
        let (mut registry, _, _, player) = setup();

        let result = registry.join(&player, GameId::new(4), Hand::Paper, FEE);
        assert_eq!(result, Err(GameError::InvalidGameId(GameId::new(4))));
    }

    #[test]
    fn test_join_twice_rejected() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Paper, FEE).unwrap();

        // Same merged signal as an out-of-range identifier.
        let other = Address::random();
        let result = registry.join(&other, id, Hand::Paper, FEE);
        assert_eq!(result, Err(GameError::InvalidGameId(id)));
    }

    #[test]
    fn test_owner_cannot_join_own_game() {
        let (mut registry, _, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();

        let result = registry.join(&owner, id, Hand::Rock, FEE);
        assert_eq!(result, Err(GameError::CannotPlayAlone));
    }

    #[test]
    fn test_cancel_refunds_owner() {
        let (mut registry, ledger, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let before = ledger.balance(&owner);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();

        registry.cancel(&owner, id).unwrap();

        let game = registry.game(id).unwrap();
        assert_eq!(game.status(), GameStatus::Completed);
        assert_eq!(game.outcome(), Some(Outcome::NoWinner));
        assert_eq!(ledger.balance(&owner), before);
        assert_eq!(ledger.escrowed(), 0);
    }

    #[test]
    fn test_cancel_requires_owner() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();

        assert_eq!(registry.cancel(&player, id), Err(GameError::NotOwner));
    }

    #[test]
    fn test_cancel_rejected_after_join() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Rock, FEE).unwrap();

        assert_eq!(registry.cancel(&owner, id), Err(GameError::CannotCancel));
    }

    #[test]
    fn test_cancel_unknown_id() {
        let (mut registry, _, owner, _) = setup();

        let result = registry.cancel(&owner, GameId::new(9));
        assert_eq!(result, Err(GameError::CannotCancel));
    }

    #[test]
    fn test_judge_owner_wins() {
        let (mut registry, ledger, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Scissors, FEE).unwrap();

        let outcome = registry.judge(&owner, id, &secret).unwrap();

        assert_eq!(outcome, Outcome::Winner(owner));
        let game = registry.game(id).unwrap();
        assert_eq!(game.status(), GameStatus::Completed);
        assert_eq!(game.outcome(), Some(Outcome::Winner(owner)));
        assert_eq!(ledger.escrowed(), 0);
    }

    #[test]
    fn test_judge_player_wins() {
        let (mut registry, ledger, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let before = ledger.balance(&player);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Paper, FEE).unwrap();

        let outcome = registry.judge(&owner, id, &secret).unwrap();

        assert_eq!(outcome, Outcome::Winner(player));
        assert_eq!(ledger.balance(&player), before + FEE);
    }

    #[test]
    fn test_judge_draw_returns_stakes() {
        let (mut registry, ledger, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let owner_before = ledger.balance(&owner);
        let player_before = ledger.balance(&player);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Rock, FEE).unwrap();

        let outcome = registry.judge(&owner, id, &secret).unwrap();

        assert_eq!(outcome, Outcome::NoWinner);
        assert_eq!(ledger.balance(&owner), owner_before);
        assert_eq!(ledger.balance(&player), player_before);
        assert_eq!(ledger.escrowed(), 0);
    }

    #[test]
    fn test_judge_by_player() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Paper);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Rock, FEE).unwrap();

        let outcome = registry.judge(&player, id, &secret).unwrap();
        assert_eq!(outcome, Outcome::Winner(owner));
    }

    #[test]
    fn test_judge_rejects_third_party() {
        let (mut registry, ledger, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Scissors, FEE).unwrap();

        let other = Address::random();
        ledger.fund(&other, FEE);
        assert_eq!(
            registry.judge(&other, id, &secret),
            Err(GameError::InvalidJudger)
        );
        assert_eq!(
            registry.judge_with_hand(&other, id, Hand::Rock, &secret),
            Err(GameError::InvalidJudger)
        );
    }

    #[test]
    fn test_judge_status_checked_before_caller() {
        let (mut registry, _, owner, _) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();

        // Still Initialized: even a stranger gets the status error.
        let other = Address::random();
        assert_eq!(
            registry.judge(&other, id, &secret),
            Err(GameError::InvalidGameStatus)
        );
        assert_eq!(
            registry.judge(&owner, id, &secret),
            Err(GameError::InvalidGameStatus)
        );
        assert_eq!(
            registry.judge_with_hand(&owner, id, Hand::Rock, &secret),
            Err(GameError::InvalidGameStatus)
        );
    }

    #[test]
    fn test_judge_wrong_secret() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Rock, FEE).unwrap();

        let result = registry.judge(&owner, id, &Secret::random());
        assert_eq!(result, Err(GameError::WrongCommitment));

        // The record is untouched by the failed reveal.
        let game = registry.game(id).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_judge_with_hand_wrong_hand() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Scissors, FEE).unwrap();

        let result = registry.judge_with_hand(&player, id, Hand::Paper, &secret);
        assert_eq!(result, Err(GameError::HandMismatch));
    }

    #[test]
    fn test_judge_with_hand_settles() {
        let (mut registry, ledger, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Scissors);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Paper, FEE).unwrap();

        let outcome = registry
            .judge_with_hand(&owner, id, Hand::Scissors, &secret)
            .unwrap();

        assert_eq!(outcome, Outcome::Winner(owner));
        assert_eq!(ledger.escrowed(), 0);
    }

    #[test]
    fn test_completed_game_cannot_be_judged_again() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, secret) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();
        registry.join(&player, id, Hand::Scissors, FEE).unwrap();
        registry.judge(&owner, id, &secret).unwrap();

        assert_eq!(
            registry.judge(&owner, id, &secret),
            Err(GameError::InvalidGameStatus)
        );
    }

    #[test]
    fn test_configure_fee() {
        let (mut registry, _, owner, player) = setup();

        registry.configure_fee(&owner, 2 * FEE).unwrap();
        assert_eq!(registry.participation_fee(), 2 * FEE);

        assert_eq!(
            registry.configure_fee(&player, FEE),
            Err(GameError::NotOwner)
        );
    }

    #[test]
    fn test_fee_change_leaves_inflight_stake() {
        let (mut registry, _, owner, player) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);
        let id = registry.initialize(&owner, commitment, FEE).unwrap();

        registry.configure_fee(&owner, 5 * FEE).unwrap();

        // Joining still matches the captured stake, not the new fee.
        registry.join(&player, id, Hand::Rock, FEE).unwrap();
        assert_eq!(registry.game(id).unwrap().stake(), FEE);
    }

    #[test]
    fn test_initialize_insufficient_balance() {
        let (mut registry, ledger, owner, _) = setup();
        let (commitment, _) = commit(&owner, Hand::Rock);

        let result = registry.initialize(&owner, commitment, 100 * FEE);
        assert!(matches!(result, Err(GameError::Ledger(_))));
        assert_eq!(ledger.escrowed(), 0);
        assert_eq!(registry.next_game_id().as_u64(), 0);
    }

    #[test]
    fn test_receive_collects_and_touches_no_record() {
        let (registry, ledger, _, player) = setup();

        registry.receive(&player, 42).unwrap();

        assert_eq!(ledger.escrowed(), 42);
        assert_eq!(registry.next_game_id().as_u64(), 0);
    }
}
